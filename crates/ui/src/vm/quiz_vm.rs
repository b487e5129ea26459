use quiz_core::model::{OptionLabel, QuizSet};
use services::{SessionOutcome, SubmitTrigger};

use crate::vm::time_fmt::format_duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: OptionLabel,
    pub text: String,
}

/// One numbered question card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub number: usize,
    pub prompt: String,
    pub options: Vec<OptionVm>,
}

impl QuestionVm {
    /// Radio group name; unique per question.
    #[must_use]
    pub fn group_name(&self) -> String {
        format!("q{}", self.index)
    }
}

#[must_use]
pub fn map_questions(quiz: &QuizSet) -> Vec<QuestionVm> {
    quiz.questions()
        .iter()
        .enumerate()
        .map(|(index, question)| QuestionVm {
            index,
            number: index + 1,
            prompt: question.prompt().to_string(),
            options: question
                .options()
                .map(|(label, text)| OptionVm {
                    label,
                    text: text.to_string(),
                })
                .collect(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub correct: u32,
    pub wrong: u32,
    pub percent: u32,
    pub tab_open_str: String,
    pub tab_switches: u32,
    pub timed_out: bool,
    pub saved: bool,
}

impl From<&SessionOutcome> for ResultVm {
    fn from(outcome: &SessionOutcome) -> Self {
        let entry = &outcome.entry;
        Self {
            correct: entry.correct_count,
            wrong: entry.wrong_count,
            percent: entry.tally().percent(),
            tab_open_str: format_duration(entry.tab_open_seconds),
            tab_switches: entry.tab_switch_count,
            timed_out: outcome.trigger == SubmitTrigger::Timer,
            saved: outcome.history_saved,
        }
    }
}

/// Message shown when submit is refused; numbers are one-based.
#[must_use]
pub fn unanswered_notice(unanswered: &[usize]) -> String {
    let numbers = unanswered
        .iter()
        .map(|index| (index + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if unanswered.len() == 1 {
        format!("Please answer question {numbers} before submitting.")
    } else {
        format!("Please answer questions {numbers} before submitting.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{HistoryEntry, Question};

    #[test]
    fn questions_are_numbered_from_one_with_labelled_options() {
        let question = Question::new(
            "2+2?",
            ["3", "4", "5", "6"].map(str::to_string),
            OptionLabel::B,
        )
        .unwrap();
        let quiz = QuizSet::new(vec![question.clone(), question]).unwrap();

        let vms = map_questions(&quiz);
        assert_eq!(vms.len(), 2);
        assert_eq!(vms[1].number, 2);
        assert_eq!(vms[1].group_name(), "q1");
        let labels: Vec<_> = vms[0].options.iter().map(|o| o.label).collect();
        assert_eq!(labels, OptionLabel::ALL.to_vec());
        assert_eq!(vms[0].options[1].text, "4");
    }

    #[test]
    fn result_reflects_trigger_and_save_state() {
        let outcome = SessionOutcome {
            trigger: SubmitTrigger::Timer,
            entry: HistoryEntry {
                correct_count: 3,
                wrong_count: 1,
                tab_open_seconds: 125,
                tab_switch_count: 2,
                completed_at: None,
            },
            history_saved: false,
        };
        let vm = ResultVm::from(&outcome);
        assert_eq!(vm.percent, 75);
        assert_eq!(vm.tab_open_str, "2m 05s");
        assert!(vm.timed_out);
        assert!(!vm.saved);
    }

    #[test]
    fn unanswered_notice_uses_one_based_numbers() {
        assert_eq!(
            unanswered_notice(&[1]),
            "Please answer question 2 before submitting."
        );
        assert_eq!(
            unanswered_notice(&[0, 2]),
            "Please answer questions 1, 3 before submitting."
        );
    }
}
