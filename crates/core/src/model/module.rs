use serde::{Deserialize, Serialize};

use crate::model::{Lesson, ModuleId};

/// An ordered block of lessons inside a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    id: ModuleId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    lessons: Vec<Lesson>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(id: ModuleId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            lessons: Vec::new(),
        }
    }

    /// Replaces the module's lessons, preserving the given order.
    #[must_use]
    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    /// The module identifier.
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// The module title as stored; may be blank.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Lessons in course order.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Number of lessons in the module.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}
