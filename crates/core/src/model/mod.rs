mod course;
mod ids;
mod lesson;
mod module;

pub use ids::{CourseId, LessonId, ModuleId, ParseIdError, UserId};

pub use course::{Course, CourseCatalog};
pub use lesson::Lesson;
pub use module::Module;
