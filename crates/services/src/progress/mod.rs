mod entry;
mod store;

// Public API of the progress subsystem.
pub use crate::error::ProgressError;
pub use entry::{LessonProgress, MergeSource, merge_entries};
pub use store::{LEGACY_PROGRESS_KEY, PROGRESS_VERSION, ProgressDocument, ProgressStore, progress_key};
