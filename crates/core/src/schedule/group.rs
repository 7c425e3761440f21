use crate::schedule::SessionLesson;

/// Groups a flat lesson list into session-sized chunks, preserving order.
///
/// The last chunk may be short. Sessions are deliberately not module-aware:
/// a session can span a module boundary. A `size` of zero is a caller error;
/// it is clamped to 1 so the grouper never loops forever or panics.
#[must_use]
pub fn group_into_sessions(lessons: Vec<SessionLesson>, size: usize) -> Vec<Vec<SessionLesson>> {
    let size = size.max(1);
    let mut sessions = Vec::with_capacity(lessons.len().div_ceil(size));
    let mut chunk = Vec::with_capacity(size);
    for lesson in lessons {
        chunk.push(lesson);
        if chunk.len() == size {
            sessions.push(std::mem::replace(&mut chunk, Vec::with_capacity(size)));
        }
    }
    if !chunk.is_empty() {
        sessions.push(chunk);
    }
    sessions
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
