use serde::{Deserialize, Serialize};

/// Per-lesson progress as persisted by the learning platform.
///
/// Stored entries carry more fields on the wire (attempt counters, hint
/// state, written-answer drafts); this type keeps what scheduling needs and
/// ignores the rest on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LessonProgressRepr", rename_all = "camelCase")]
pub struct LessonProgress {
    completed: Vec<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lesson_completed: Option<bool>,
    updated_at: i64,
}

impl LessonProgress {
    /// Creates a fresh entry with one unsolved flag per challenge.
    #[must_use]
    pub fn new(challenge_count: usize) -> Self {
        Self {
            completed: vec![false; challenge_count],
            lesson_completed: None,
            updated_at: 0,
        }
    }

    /// Per-challenge completion flags, in challenge order.
    #[must_use]
    pub fn challenge_flags(&self) -> &[bool] {
        &self.completed
    }

    /// The explicit whole-lesson flag, when the entry carries one.
    #[must_use]
    pub fn explicit_completion(&self) -> Option<bool> {
        self.lesson_completed
    }

    /// Epoch milliseconds of the last update; 0 when never touched.
    #[must_use]
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Whether the lesson counts as done.
    ///
    /// An explicit whole-lesson flag wins either way; without one, every
    /// challenge flag must be set and there must be at least one.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.lesson_completed {
            Some(done) => done,
            None => !self.completed.is_empty() && self.completed.iter().all(|&done| done),
        }
    }

    /// Records challenge `index` as solved at `at_ms`, growing the flag list
    /// when the entry predates the challenge.
    pub fn mark_challenge(&mut self, index: usize, at_ms: i64) {
        if index >= self.completed.len() {
            self.completed.resize(index + 1, false);
        }
        self.completed[index] = true;
        self.updated_at = at_ms;
    }

    /// Marks the whole lesson complete at `at_ms`.
    pub fn mark_complete(&mut self, at_ms: i64) {
        self.lesson_completed = Some(true);
        self.updated_at = at_ms;
    }
}

/// Which side of a merge was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSource {
    Local,
    Remote,
}

/// Picks the fresher of two progress entries by `updated_at`.
///
/// The remote side wins ties, so a round trip through the server converges on
/// the server's copy.
#[must_use]
pub fn merge_entries(
    local: Option<LessonProgress>,
    remote: Option<LessonProgress>,
) -> Option<(LessonProgress, MergeSource)> {
    match (local, remote) {
        (None, None) => None,
        (None, Some(remote)) => Some((remote, MergeSource::Remote)),
        (Some(local), None) => Some((local, MergeSource::Local)),
        (Some(local), Some(remote)) => {
            if local.updated_at > remote.updated_at {
                Some((local, MergeSource::Local))
            } else {
                Some((remote, MergeSource::Remote))
            }
        }
    }
}

/// Wire shape: either a bare list of challenge flags (the earliest stored
/// form) or a full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum LessonProgressRepr {
    Flags(Vec<bool>),
    Full {
        #[serde(default)]
        completed: Vec<bool>,
        #[serde(default, rename = "lessonCompleted")]
        lesson_completed: Option<bool>,
        #[serde(default, rename = "updatedAt")]
        updated_at: Option<serde_json::Value>,
    },
}

impl From<LessonProgressRepr> for LessonProgress {
    fn from(repr: LessonProgressRepr) -> Self {
        match repr {
            LessonProgressRepr::Flags(completed) => Self {
                completed,
                lesson_completed: None,
                updated_at: 0,
            },
            LessonProgressRepr::Full {
                completed,
                lesson_completed,
                updated_at,
            } => Self {
                completed,
                lesson_completed,
                updated_at: timestamp_millis(updated_at.as_ref()),
            },
        }
    }
}

/// Coerces a stored timestamp to epoch milliseconds.
///
/// Entries written by older clients carry the timestamp as a JSON string,
/// and hand-edited files may hold fractions; anything unusable reads as 0.
fn timestamp_millis(value: Option<&serde_json::Value>) -> i64 {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(ts) if ts.is_finite() => ts.floor() as i64,
        _ => 0,
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
