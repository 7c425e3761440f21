use crate::model::Module;
use crate::schedule::{ModuleRef, SessionLesson};

/// Course lessons flattened into scheduling order.
#[derive(Debug, Clone, Default)]
pub struct FlatLessons {
    /// Lessons available from the start, in course order.
    pub active: Vec<SessionLesson>,
    /// Lessons gated until everything before them is done, in course order.
    /// These are appended after the active ones when scheduling.
    pub locked: Vec<SessionLesson>,
}

impl FlatLessons {
    /// All lessons in scheduling order: active first, locked last.
    #[must_use]
    pub fn into_scheduling_order(self) -> Vec<SessionLesson> {
        let mut all = self.active;
        all.extend(self.locked);
        all
    }

    /// Total number of lessons, both lists combined.
    #[must_use]
    pub fn total(&self) -> usize {
        self.active.len() + self.locked.len()
    }
}

/// Flattens modules into ordered lesson entries, splitting out lessons that
/// are locked until everything before them is completed.
///
/// Order within each list follows module order, then lesson order.
#[must_use]
pub fn flatten_lessons(modules: &[Module]) -> FlatLessons {
    let mut flat = FlatLessons::default();
    for module in modules {
        let module_ref = ModuleRef::from(module);
        for lesson in module.lessons() {
            let entry = SessionLesson::new(module_ref.clone(), lesson.clone());
            if lesson.is_locked() {
                flat.locked.push(entry);
            } else {
                flat.active.push(entry);
            }
        }
    }
    flat
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lesson, LessonId, ModuleId};

    fn lesson(id: &str) -> Lesson {
        Lesson::new(LessonId::new(id).unwrap(), format!("Aula {id}"))
    }

    fn build_modules() -> Vec<Module> {
        vec![
            Module::new(ModuleId::new("mod1").unwrap(), "Fundamentos")
                .with_lessons(vec![lesson("l1"), lesson("l2")]),
            Module::new(ModuleId::new("mod2").unwrap(), "Desafio final")
                .with_lessons(vec![lesson("l3").locked(), lesson("l4")]),
        ]
    }

    #[test]
    fn splits_locked_from_active_preserving_order() {
        let flat = flatten_lessons(&build_modules());
        let active: Vec<_> = flat
            .active
            .iter()
            .filter_map(|e| e.lesson().id().map(|id| id.as_str()))
            .collect();
        let locked: Vec<_> = flat
            .locked
            .iter()
            .filter_map(|e| e.lesson().id().map(|id| id.as_str()))
            .collect();
        assert_eq!(active, ["l1", "l2", "l4"]);
        assert_eq!(locked, ["l3"]);
        assert_eq!(flat.total(), 4);
    }

    #[test]
    fn entries_carry_their_own_module() {
        let flat = flatten_lessons(&build_modules());
        assert_eq!(flat.active[0].module().title(), "Fundamentos");
        assert_eq!(flat.active[2].module().title(), "Desafio final");
        assert_eq!(flat.locked[0].module().id().as_str(), "mod2");
    }

    #[test]
    fn scheduling_order_puts_locked_last() {
        let all = flatten_lessons(&build_modules()).into_scheduling_order();
        let ids: Vec<_> = all
            .iter()
            .filter_map(|e| e.lesson().id().map(|id| id.as_str()))
            .collect();
        assert_eq!(ids, ["l1", "l2", "l4", "l3"]);
    }

    #[test]
    fn empty_modules_flatten_to_nothing() {
        let flat = flatten_lessons(&[]);
        assert_eq!(flat.total(), 0);
        assert!(flat.into_scheduling_order().is_empty());
    }
}
