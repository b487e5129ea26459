use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerSheet, OptionLabel, Question, ScoreTally};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSetError {
    #[error("quiz has no questions")]
    Empty,
}

/// Ordered, non-empty list of questions for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
    questions: Vec<Question>,
}

impl QuizSet {
    /// # Errors
    ///
    /// Returns `QuizSetError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizSetError> {
        if questions.is_empty() {
            return Err(QuizSetError::Empty);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// An empty answer sheet sized for this quiz.
    #[must_use]
    pub fn blank_sheet(&self) -> AnswerSheet {
        AnswerSheet::new(self.len())
    }

    /// Score `sheet` against this quiz. Missing selections count as wrong.
    #[must_use]
    pub fn score(&self, sheet: &AnswerSheet) -> ScoreTally {
        let mut tally = ScoreTally::default();
        for (index, question) in self.questions.iter().enumerate() {
            match sheet.selection(index) {
                Some(label) if question.is_correct(label) => {
                    tally.correct = tally.correct.saturating_add(1);
                }
                _ => tally.wrong = tally.wrong.saturating_add(1),
            }
        }
        tally
    }

    /// Labels of the correct answers in question order.
    pub fn answer_key(&self) -> impl Iterator<Item = OptionLabel> + '_ {
        self.questions.iter().map(Question::correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str, correct: OptionLabel) -> Question {
        Question::new(
            prompt,
            ["3".into(), "4".into(), "5".into(), "6".into()],
            correct,
        )
        .unwrap()
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert_eq!(QuizSet::new(Vec::new()).unwrap_err(), QuizSetError::Empty);
    }

    #[test]
    fn wrong_selection_scores_as_wrong() {
        let quiz = QuizSet::new(vec![question("2+2?", OptionLabel::B)]).unwrap();
        let mut sheet = quiz.blank_sheet();
        sheet.select(0, OptionLabel::A).unwrap();

        let tally = quiz.score(&sheet);
        assert_eq!(tally.correct, 0);
        assert_eq!(tally.wrong, 1);
    }

    #[test]
    fn tallies_always_sum_to_question_count() {
        let quiz = QuizSet::new(vec![
            question("q1", OptionLabel::A),
            question("q2", OptionLabel::B),
            question("q3", OptionLabel::C),
            question("q4", OptionLabel::D),
        ])
        .unwrap();

        for pick in OptionLabel::ALL {
            let mut sheet = quiz.blank_sheet();
            for index in 0..quiz.len() {
                sheet.select(index, pick).unwrap();
            }
            let tally = quiz.score(&sheet);
            assert_eq!(tally.total() as usize, quiz.len());
            assert_eq!(tally.correct, 1);
        }
    }

    #[test]
    fn unanswered_questions_score_as_wrong() {
        let quiz = QuizSet::new(vec![
            question("q1", OptionLabel::A),
            question("q2", OptionLabel::B),
        ])
        .unwrap();
        let mut sheet = quiz.blank_sheet();
        sheet.select(0, OptionLabel::A).unwrap();

        let tally = quiz.score(&sheet);
        assert_eq!(tally.correct, 1);
        assert_eq!(tally.wrong, 1);
    }
}
