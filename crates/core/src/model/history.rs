use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ScoreTally, SessionState};

/// Outcome of one completed session, as stored in the history slot.
///
/// Serialized with camelCase keys. `completedAt` is optional so entries
/// written without it still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub correct_count: u32,
    pub wrong_count: u32,
    pub tab_open_seconds: u32,
    pub tab_switch_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Snapshot the counters of a submitted session.
    #[must_use]
    pub fn from_state(state: &SessionState, completed_at: DateTime<Utc>) -> Self {
        Self {
            correct_count: state.correct_count,
            wrong_count: state.wrong_count,
            tab_open_seconds: state.tab_open_seconds,
            tab_switch_count: state.tab_switch_count,
            completed_at: Some(completed_at),
        }
    }

    #[must_use]
    pub fn tally(&self) -> ScoreTally {
        ScoreTally {
            correct: self.correct_count,
            wrong: self.wrong_count,
        }
    }
}

/// Ordered, append-only list of past sessions (oldest first).
pub type HistoryLog = Vec<HistoryEntry>;
