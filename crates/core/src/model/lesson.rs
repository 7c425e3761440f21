use serde::{Deserialize, Serialize};

use crate::model::LessonId;

/// A single lesson inside a course module.
///
/// Course content ships as JSON written by hand, so this type is tolerant by
/// construction: a lesson may appear as a full object or as a bare string
/// identifier, titles may be blank, and an identifier may be missing
/// altogether. Presentation layers apply fallbacks; the model keeps what the
/// data says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LessonRepr")]
pub struct Lesson {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<LessonId>,
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    locked_until_all_previous_completed: bool,
}

impl Lesson {
    /// Creates a lesson with an identifier and title.
    #[must_use]
    pub fn new(id: LessonId, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            slug: None,
            locked_until_all_previous_completed: false,
        }
    }

    /// Creates a lesson known only by its identifier, the bare-string form
    /// found in course data.
    #[must_use]
    pub fn from_bare_id(id: LessonId) -> Self {
        Self {
            id: Some(id),
            title: String::new(),
            slug: None,
            locked_until_all_previous_completed: false,
        }
    }

    /// Sets the URL slug.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        self.slug = if slug.trim().is_empty() {
            None
        } else {
            Some(slug)
        };
        self
    }

    /// Marks the lesson as locked until all previous lessons are completed.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked_until_all_previous_completed = true;
        self
    }

    /// The lesson identifier, when the data carries one.
    #[must_use]
    pub fn id(&self) -> Option<&LessonId> {
        self.id.as_ref()
    }

    /// The lesson title as stored; may be blank.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The URL slug, when one exists.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Whether the lesson is gated behind completion of everything before it.
    ///
    /// Locked lessons still belong to the plan; they are scheduled after all
    /// unlocked lessons instead of in course order.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked_until_all_previous_completed
    }
}

/// Wire shape: either `"lesson_m1_1"` or a full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum LessonRepr {
    Bare(String),
    Full {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        slug: Option<String>,
        #[serde(default)]
        locked_until_all_previous_completed: Option<bool>,
    },
}

impl From<LessonRepr> for Lesson {
    fn from(repr: LessonRepr) -> Self {
        match repr {
            LessonRepr::Bare(raw) => Self {
                id: LessonId::new(raw).ok(),
                title: String::new(),
                slug: None,
                locked_until_all_previous_completed: false,
            },
            LessonRepr::Full {
                id,
                title,
                slug,
                locked_until_all_previous_completed,
            } => Self {
                id: id.and_then(|raw| LessonId::new(raw).ok()),
                title: title.unwrap_or_default(),
                slug: slug.filter(|s| !s.trim().is_empty()),
                locked_until_all_previous_completed: locked_until_all_previous_completed
                    .unwrap_or(false),
            },
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_object() {
        let lesson: Lesson = serde_json::from_str(
            r#"{"id": "lesson_m1_1", "title": "SELECT básico", "slug": "select-basico"}"#,
        )
        .unwrap();
        assert_eq!(lesson.id().unwrap().as_str(), "lesson_m1_1");
        assert_eq!(lesson.title(), "SELECT básico");
        assert_eq!(lesson.slug(), Some("select-basico"));
        assert!(!lesson.is_locked());
    }

    #[test]
    fn deserializes_bare_string_as_id_only() {
        let lesson: Lesson = serde_json::from_str(r#""lesson_m1_2""#).unwrap();
        assert_eq!(lesson.id().unwrap().as_str(), "lesson_m1_2");
        assert_eq!(lesson.title(), "");
        assert_eq!(lesson.slug(), None);
    }

    #[test]
    fn blank_id_becomes_none() {
        let lesson: Lesson = serde_json::from_str(r#"{"id": "  ", "title": "Sem chave"}"#).unwrap();
        assert_eq!(lesson.id(), None);
        assert_eq!(lesson.title(), "Sem chave");
    }

    #[test]
    fn locked_flag_is_read() {
        let lesson: Lesson = serde_json::from_str(
            r#"{"id": "lesson_final", "locked_until_all_previous_completed": true}"#,
        )
        .unwrap();
        assert!(lesson.is_locked());
    }

    #[test]
    fn serializes_object_form() {
        let lesson = Lesson::new(LessonId::new("lesson_m1_1").unwrap(), "SELECT básico");
        let json = serde_json::to_value(&lesson).unwrap();
        assert_eq!(json["id"], "lesson_m1_1");
        assert_eq!(json["title"], "SELECT básico");
        assert!(json.get("slug").is_none());
        assert!(json.get("locked_until_all_previous_completed").is_none());
    }

    #[test]
    fn builder_helpers() {
        let lesson = Lesson::new(LessonId::new("l1").unwrap(), "Joins")
            .with_slug("joins")
            .locked();
        assert_eq!(lesson.slug(), Some("joins"));
        assert!(lesson.is_locked());
        assert_eq!(lesson.with_slug("   ").slug(), None);
    }
}
