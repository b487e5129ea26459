use quiz_core::model::HistoryEntry;

use crate::vm::time_fmt::{format_datetime, format_duration};

/// One row of the history table. `number` is one-based, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub number: usize,
    pub correct: u32,
    pub wrong: u32,
    pub percent: u32,
    pub tab_open_str: String,
    pub tab_switches: u32,
    /// `-` when the entry carries no timestamp.
    pub completed_at_str: String,
}

impl HistoryRowVm {
    fn new(number: usize, entry: &HistoryEntry) -> Self {
        Self {
            number,
            correct: entry.correct_count,
            wrong: entry.wrong_count,
            percent: entry.tally().percent(),
            tab_open_str: format_duration(entry.tab_open_seconds),
            tab_switches: entry.tab_switch_count,
            completed_at_str: entry
                .completed_at
                .map_or_else(|| "-".to_string(), format_datetime),
        }
    }
}

#[must_use]
pub fn map_history_rows(history: &[HistoryEntry]) -> Vec<HistoryRowVm> {
    history
        .iter()
        .enumerate()
        .map(|(index, entry)| HistoryRowVm::new(index + 1, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn rows_keep_storage_order_and_optional_timestamp() {
        let history = vec![
            HistoryEntry {
                correct_count: 1,
                wrong_count: 0,
                tab_open_seconds: 42,
                tab_switch_count: 0,
                completed_at: None,
            },
            HistoryEntry {
                correct_count: 2,
                wrong_count: 2,
                tab_open_seconds: 300,
                tab_switch_count: 3,
                completed_at: Some(fixed_now()),
            },
        ];

        let rows = map_history_rows(&history);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].percent, 100);
        assert_eq!(rows[0].completed_at_str, "-");
        assert_eq!(rows[1].percent, 50);
        assert_eq!(rows[1].tab_open_str, "5m 00s");
        assert_eq!(rows[1].completed_at_str, "2023-11-14 22:13 UTC");
    }
}
