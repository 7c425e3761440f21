use serde::{Deserialize, Serialize};

use crate::model::{CourseId, Lesson, LessonId, Module};

/// A course: ordered modules, each with ordered lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modules: Vec<Module>,
}

impl Course {
    /// Creates an empty course.
    #[must_use]
    pub fn new(id: CourseId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            slug: None,
            modules: Vec::new(),
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

    /// Replaces the course's modules, preserving the given order.
    #[must_use]
    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = modules;
        self
    }

    /// The course identifier.
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    /// The course title as stored; may be blank.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The URL slug, when one exists.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Modules in course order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Total number of lessons across all modules.
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(Module::lesson_count).sum()
    }

    /// All lesson identifiers in course order, skipping lessons without one.
    #[must_use]
    pub fn lesson_ids(&self) -> Vec<&LessonId> {
        self.flat_lessons().filter_map(Lesson::id).collect()
    }

    /// Resolves a lesson URL slug to the lesson's identifier.
    #[must_use]
    pub fn lesson_id_for_slug(&self, slug: &str) -> Option<&LessonId> {
        self.flat_lessons()
            .find(|lesson| lesson.slug() == Some(slug))
            .and_then(Lesson::id)
    }

    /// Resolves a lesson identifier to its URL slug, when the lesson has one.
    #[must_use]
    pub fn slug_for_lesson(&self, id: &LessonId) -> Option<&str> {
        self.flat_lessons()
            .find(|lesson| lesson.id() == Some(id))
            .and_then(Lesson::slug)
    }

    /// Slug of the first lesson in the course that has one.
    #[must_use]
    pub fn first_lesson_slug(&self) -> Option<&str> {
        self.flat_lessons().find_map(Lesson::slug)
    }

    /// Slugs of the lessons immediately before and after the given lesson, in
    /// flattened course order. Either side is `None` at the edges or when the
    /// neighbor has no slug.
    #[must_use]
    pub fn adjacent_slugs(&self, id: &LessonId) -> (Option<&str>, Option<&str>) {
        let flat: Vec<&Lesson> = self.flat_lessons().collect();
        let Some(idx) = flat.iter().position(|lesson| lesson.id() == Some(id)) else {
            return (None, None);
        };
        let prev = idx
            .checked_sub(1)
            .and_then(|i| flat.get(i))
            .and_then(|lesson| lesson.slug());
        let next = flat.get(idx + 1).and_then(|lesson| lesson.slug());
        (prev, next)
    }

    fn flat_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|module| module.lessons().iter())
    }
}

/// The course catalog document served by the platform (`{"courses": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCatalog {
    #[serde(default)]
    courses: Vec<Course>,
}

impl CourseCatalog {
    /// Creates a catalog from a list of courses.
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// All courses in catalog order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Finds a course by identifier.
    #[must_use]
    pub fn find(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id() == id)
    }

    /// Finds a course by URL slug, falling back to treating the slug as a
    /// course identifier when no slug matches.
    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&Course> {
        self.courses
            .iter()
            .find(|course| course.slug() == Some(slug))
            .or_else(|| {
                self.courses
                    .iter()
                    .find(|course| course.id().as_str() == slug)
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleId;

    fn lesson(id: &str, slug: Option<&str>) -> Lesson {
        let base = Lesson::new(LessonId::new(id).unwrap(), format!("Aula {id}"));
        match slug {
            Some(s) => base.with_slug(s),
            None => base,
        }
    }

    fn build_course() -> Course {
        Course::new(CourseId::new("sql-course").unwrap(), "SQL do Zero")
            .with_slug("sql-basico-avancado")
            .with_modules(vec![
                Module::new(ModuleId::new("mod1").unwrap(), "Fundamentos").with_lessons(vec![
                    lesson("l1", Some("select-basico")),
                    lesson("l2", None),
                ]),
                Module::new(ModuleId::new("mod2").unwrap(), "Joins").with_lessons(vec![
                    lesson("l3", Some("inner-join")),
                    lesson("l4", Some("outer-join")),
                ]),
            ])
    }

    #[test]
    fn totals_span_modules() {
        let course = build_course();
        assert_eq!(course.total_lessons(), 4);
        assert_eq!(course.lesson_ids().len(), 4);
    }

    #[test]
    fn slug_to_id_and_back() {
        let course = build_course();
        let id = course.lesson_id_for_slug("inner-join").unwrap();
        assert_eq!(id.as_str(), "l3");
        assert_eq!(course.slug_for_lesson(id), Some("inner-join"));
    }

    #[test]
    fn lesson_without_slug_resolves_to_none() {
        let course = build_course();
        let id = LessonId::new("l2").unwrap();
        assert_eq!(course.slug_for_lesson(&id), None);
    }

    #[test]
    fn first_lesson_slug_skips_nothing_here() {
        assert_eq!(build_course().first_lesson_slug(), Some("select-basico"));
    }

    #[test]
    fn adjacent_slugs_cross_module_boundaries() {
        let course = build_course();
        let id = LessonId::new("l3").unwrap();
        // l2 has no slug, l4 does.
        let (prev, next) = course.adjacent_slugs(&id);
        assert_eq!(prev, None);
        assert_eq!(next, Some("outer-join"));
    }

    #[test]
    fn adjacent_slugs_for_unknown_lesson() {
        let course = build_course();
        let id = LessonId::new("ghost").unwrap();
        assert_eq!(course.adjacent_slugs(&id), (None, None));
    }

    #[test]
    fn catalog_lookup_by_id_and_slug() {
        let catalog = CourseCatalog::new(vec![build_course()]);
        let id = CourseId::new("sql-course").unwrap();
        assert!(catalog.find(&id).is_some());
        assert!(catalog.find_by_slug("sql-basico-avancado").is_some());
        // Slug falls back to the id form.
        assert!(catalog.find_by_slug("sql-course").is_some());
        assert!(catalog.find_by_slug("desconhecido").is_none());
    }

    #[test]
    fn catalog_document_shape() {
        let catalog: CourseCatalog = serde_json::from_str(
            r#"{"courses": [{"id": "sql-course", "title": "SQL do Zero", "modules": []}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.courses().len(), 1);
        assert_eq!(catalog.courses()[0].title(), "SQL do Zero");
    }
}
