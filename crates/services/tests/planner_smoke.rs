use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use services::{Clock, LessonProgress, SchedulePlanner, SessionStatus};
use storage::kv::{InMemoryStore, KeyValueStore};
use trilha_core::{Course, CourseId, Lesson, LessonId, Module, ModuleId, ScheduleOptions, UserId};

fn build_course() -> Course {
    let fundamentos = Module::new(ModuleId::new("mod1").unwrap(), "Fundamentos").with_lessons(vec![
        Lesson::new(LessonId::new("l1").unwrap(), "SELECT básico"),
        Lesson::new(LessonId::new("l2").unwrap(), "WHERE e filtros"),
        Lesson::new(LessonId::new("l3").unwrap(), "ORDER BY"),
    ]);
    let joins = Module::new(ModuleId::new("mod2").unwrap(), "Joins").with_lessons(vec![
        Lesson::new(LessonId::new("l4").unwrap(), "INNER JOIN"),
        Lesson::new(LessonId::new("l5").unwrap(), "LEFT JOIN"),
        Lesson::new(LessonId::new("l6").unwrap(), "Desafio final").locked(),
    ]);
    Course::new(CourseId::new("sql-course").unwrap(), "SQL do Zero")
        .with_modules(vec![fundamentos, joins])
}

#[tokio::test]
async fn plan_progress_and_views_share_one_store() {
    let kv = Arc::new(InMemoryStore::new());
    let planner = SchedulePlanner::new(Clock::default_clock(), kv.clone());
    let user = UserId::new("u1").unwrap();
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

    // Record progress through the store the planner exposes.
    let mut entry = LessonProgress::new(2);
    entry.mark_challenge(0, 1_000);
    entry.mark_challenge(1, 2_000);
    planner
        .progress()
        .write_lesson(&user, LessonId::new("l1").unwrap(), entry)
        .await
        .unwrap();

    let mut done = LessonProgress::new(0);
    done.mark_complete(3_000);
    planner
        .progress()
        .write_lesson(&user, LessonId::new("l2").unwrap(), done)
        .await
        .unwrap();

    let options = ScheduleOptions::new(start);
    let mut plan = planner
        .plan_for_user(&build_course(), &options, &user)
        .await
        .unwrap();

    // 6 lessons, 2 per session: Mon/Wed/Fri starting Jan 6.
    let schedule = plan.schedule();
    assert_eq!(schedule.sessions().len(), 3);
    assert_eq!(schedule.total_lessons(), 6);
    assert!(schedule.warning().is_none());

    // The locked challenge lesson is pushed to the very end.
    let last = schedule.sessions().last().unwrap();
    let last_ids: Vec<&str> = last
        .lessons()
        .iter()
        .filter_map(|item| item.lesson().id())
        .map(|id| id.as_str())
        .collect();
    assert_eq!(last_ids, vec!["l5", "l6"]);

    // First session fully complete, the rest untouched.
    assert_eq!(plan.status_of(&schedule.sessions()[0]), SessionStatus::Concluida);
    assert_eq!(plan.status_of(&schedule.sessions()[1]), SessionStatus::Pendente);

    let overview = plan.overview();
    assert_eq!(overview.completed_lessons, 2);
    assert_eq!(overview.remaining_lessons, 4);
    assert_eq!(overview.remaining_sessions, 2);
    assert_eq!(overview.remaining_minutes, 160);

    let weeks = plan.weeks();
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].sessions().len(), 3);

    // The progress document is really in the shared key-value store.
    let raw = kv.get("sql_lesson_progress_u_u1").await.unwrap().unwrap();
    assert!(raw.contains("\"version\":4"));

    // A remote status map can only add completions on top.
    let mut status = HashMap::new();
    status.insert(LessonId::new("l3").unwrap(), true);
    status.insert(LessonId::new("l1").unwrap(), false);
    plan.apply_remote_status(&status);
    assert_eq!(plan.overview().completed_lessons, 3);
    assert_eq!(plan.status_of(&plan.schedule().sessions()[1]), SessionStatus::Parcial);
}
