use serde::{Deserialize, Serialize};

/// Session length used when no duration is configured.
pub const DEFAULT_DURATION_SECS: u32 = 300;

/// Lifecycle stage of a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    Active,
    Submitted,
}

impl SessionPhase {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Correct/wrong counts for a scored session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    pub correct: u32,
    pub wrong: u32,
}

impl ScoreTally {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct.saturating_add(self.wrong)
    }

    /// Whole-number percentage of correct answers; zero for an empty tally.
    #[must_use]
    pub fn percent(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let pct = u64::from(self.correct) * 100 / u64::from(total);
        u32::try_from(pct).unwrap_or(100)
    }
}

/// Mutable state of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub correct_count: u32,
    pub wrong_count: u32,
    pub seconds_remaining: u32,
    pub tab_open_seconds: u32,
    pub tab_switch_count: u32,
    pub phase: SessionPhase,
}

impl SessionState {
    /// Fresh state for a session of `duration_secs`.
    #[must_use]
    pub fn reset(duration_secs: u32) -> Self {
        Self {
            correct_count: 0,
            wrong_count: 0,
            seconds_remaining: duration_secs,
            tab_open_seconds: 0,
            tab_switch_count: 0,
            phase: SessionPhase::Idle,
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

impl Default for SessionState {
    fn default() -> Self {
        Self::reset(DEFAULT_DURATION_SECS)
    }
}
