use thiserror::Error;

use crate::model::OptionLabel;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question index {index} out of range (quiz has {len} questions)")]
    OutOfRange { index: usize, len: usize },
}

/// Per-question selections for the active session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: Vec<Option<OptionLabel>>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            selections: vec![None; len],
        }
    }

    /// Record `label` for the question at `index`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::OutOfRange` when `index` is not a question of this sheet.
    pub fn select(&mut self, index: usize, label: OptionLabel) -> Result<(), AnswerError> {
        let len = self.selections.len();
        let slot = self
            .selections
            .get_mut(index)
            .ok_or(AnswerError::OutOfRange { index, len })?;
        *slot = Some(label);
        Ok(())
    }

    #[must_use]
    pub fn selection(&self, index: usize) -> Option<OptionLabel> {
        self.selections.get(index).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Zero-based indices of questions with no selection.
    #[must_use]
    pub fn unanswered(&self) -> Vec<usize> {
        self.selections
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.is_none().then_some(index))
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_and_report_unanswered() {
        let mut sheet = AnswerSheet::new(3);
        sheet.select(1, OptionLabel::C).unwrap();
        assert_eq!(sheet.selection(1), Some(OptionLabel::C));
        assert_eq!(sheet.unanswered(), vec![0, 2]);
        assert!(!sheet.is_complete());

        sheet.select(0, OptionLabel::A).unwrap();
        sheet.select(2, OptionLabel::A).unwrap();
        sheet.select(2, OptionLabel::D).unwrap();
        assert!(sheet.is_complete());
        assert_eq!(sheet.selection(2), Some(OptionLabel::D));
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let mut sheet = AnswerSheet::new(1);
        let err = sheet.select(4, OptionLabel::A).unwrap_err();
        assert_eq!(err, AnswerError::OutOfRange { index: 4, len: 1 });
    }
}
