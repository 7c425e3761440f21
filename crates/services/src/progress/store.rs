use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use storage::kv::{InMemoryStore, KeyValueStore};
use trilha_core::{LessonId, UserId};

use super::entry::{LessonProgress, MergeSource, merge_entries};
use crate::error::ProgressError;

/// Version tag written with every progress document.
pub const PROGRESS_VERSION: u32 = 4;

/// Key progress lived under before documents were scoped per user.
pub const LEGACY_PROGRESS_KEY: &str = "sql_lesson_progress";

/// Storage key for a user's progress document.
#[must_use]
pub fn progress_key(user: &UserId) -> String {
    format!("sql_lesson_progress_u_{user}")
}

/// A user's complete lesson progress, as one versioned document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressDocument {
    version: u32,
    lessons: HashMap<LessonId, LessonProgress>,
}

impl Default for ProgressDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressDocument {
    /// Creates an empty document at the current version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: PROGRESS_VERSION,
            lessons: HashMap::new(),
        }
    }

    /// Decodes a raw document, tolerating every historical shape.
    ///
    /// Older clients stored the lesson map bare or without a version tag, and
    /// individual entries may use shapes this crate no longer writes. Anything
    /// unreadable decodes as absent rather than failing the document.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            return Self::new();
        };
        let Value::Object(mut fields) = value else {
            return Self::new();
        };
        let entries = match fields.remove("lessons") {
            Some(Value::Object(entries)) => entries,
            Some(_) => serde_json::Map::new(),
            None => fields,
        };

        let mut lessons = HashMap::new();
        for (key, entry) in entries {
            let Ok(id) = key.parse::<LessonId>() else {
                continue;
            };
            if let Ok(progress) = serde_json::from_value::<LessonProgress>(entry) {
                lessons.insert(id, progress);
            }
        }
        Self {
            version: PROGRESS_VERSION,
            lessons,
        }
    }

    /// The document version; always the current one after decode.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// True when no lesson has any recorded progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Number of lessons with recorded progress.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// All entries, keyed by lesson.
    #[must_use]
    pub fn lessons(&self) -> &HashMap<LessonId, LessonProgress> {
        &self.lessons
    }

    /// One lesson's entry, if any.
    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&LessonProgress> {
        self.lessons.get(id)
    }

    /// Inserts or replaces one lesson's entry.
    pub fn set_lesson(&mut self, id: LessonId, progress: LessonProgress) {
        self.lessons.insert(id, progress);
    }

    /// Lesson-completion map consumed by schedule views.
    #[must_use]
    pub fn completion_map(&self) -> HashMap<LessonId, bool> {
        self.lessons
            .iter()
            .map(|(id, entry)| (id.clone(), entry.is_complete()))
            .collect()
    }

    /// Folds `remote` entries in, keeping the fresher side per lesson (the
    /// remote side wins ties). Returns how many lessons took the remote copy.
    pub fn merge_remote(&mut self, remote: HashMap<LessonId, LessonProgress>) -> usize {
        let mut taken = 0;
        for (id, remote_entry) in remote {
            let local_entry = self.lessons.remove(&id);
            if let Some((merged, source)) = merge_entries(local_entry, Some(remote_entry)) {
                if source == MergeSource::Remote {
                    taken += 1;
                }
                self.lessons.insert(id, merged);
            }
        }
        taken
    }
}

/// Progress persistence facade over a key-value store.
///
/// Documents live under a per-user key. A document found under the legacy
/// unscoped key is copied to the user key on first read; the legacy copy is
/// left in place, so the migration is one-way and runs at most once per user.
#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Loads a user's progress document, migrating legacy data when the
    /// user-scoped key holds nothing yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when the backing store fails.
    pub async fn read(&self, user: &UserId) -> Result<ProgressDocument, ProgressError> {
        let user_key = progress_key(user);
        let user_doc = self.read_key(&user_key).await?;
        if !user_doc.is_empty() {
            return Ok(user_doc);
        }

        let legacy_doc = self.read_key(LEGACY_PROGRESS_KEY).await?;
        if legacy_doc.is_empty() {
            return Ok(user_doc);
        }

        self.write_key(&user_key, &legacy_doc).await?;
        Ok(legacy_doc)
    }

    /// Persists a user's progress document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when encoding or the backing store fails.
    pub async fn write(
        &self,
        user: &UserId,
        document: &ProgressDocument,
    ) -> Result<(), ProgressError> {
        self.write_key(&progress_key(user), document).await
    }

    /// Fetches one lesson's entry.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when the backing store fails.
    pub async fn lesson(
        &self,
        user: &UserId,
        lesson: &LessonId,
    ) -> Result<Option<LessonProgress>, ProgressError> {
        Ok(self.read(user).await?.lesson(lesson).cloned())
    }

    /// Inserts or replaces one lesson's entry and persists the document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when encoding or the backing store fails.
    pub async fn write_lesson(
        &self,
        user: &UserId,
        lesson: LessonId,
        progress: LessonProgress,
    ) -> Result<(), ProgressError> {
        let mut document = self.read(user).await?;
        document.set_lesson(lesson, progress);
        self.write(user, &document).await
    }

    /// Lesson-completion map for a user.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when the backing store fails.
    pub async fn completion_map(
        &self,
        user: &UserId,
    ) -> Result<HashMap<LessonId, bool>, ProgressError> {
        Ok(self.read(user).await?.completion_map())
    }

    /// Merges remote entries into a user's document and persists the result.
    /// Returns how many lessons took the remote copy.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when encoding or the backing store fails.
    pub async fn merge_remote(
        &self,
        user: &UserId,
        remote: HashMap<LessonId, LessonProgress>,
    ) -> Result<usize, ProgressError> {
        let mut document = self.read(user).await?;
        let taken = document.merge_remote(remote);
        self.write(user, &document).await?;
        Ok(taken)
    }

    async fn read_key(&self, key: &str) -> Result<ProgressDocument, ProgressError> {
        let raw = self.store.get(key).await?;
        Ok(raw.map_or_else(ProgressDocument::new, |raw| ProgressDocument::parse(&raw)))
    }

    async fn write_key(&self, key: &str, document: &ProgressDocument) -> Result<(), ProgressError> {
        let encoded = serde_json::to_string(document)?;
        self.store.set(key, &encoded).await?;
        Ok(())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
