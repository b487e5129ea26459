use std::env;

use quiz_core::model::DEFAULT_DURATION_SECS;

use crate::history::DEFAULT_HISTORY_KEY;

/// Default question endpoint (a local JSON server).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:2003/Quiz";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub endpoint: String,
    pub duration_secs: u32,
    pub history_key: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
        }
    }
}

impl QuizConfig {
    /// Read `QUIZ_ENDPOINT`, `QUIZ_DURATION_SECS` and `QUIZ_HISTORY_KEY`,
    /// falling back to defaults for unset, blank or unparsable values.
    /// A zero duration counts as unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            endpoint: non_blank("QUIZ_ENDPOINT").unwrap_or(defaults.endpoint),
            duration_secs: non_blank("QUIZ_DURATION_SECS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.duration_secs),
            history_key: non_blank("QUIZ_HISTORY_KEY").unwrap_or(defaults.history_key),
        }
    }
}
