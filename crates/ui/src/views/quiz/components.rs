use dioxus::prelude::*;

use quiz_core::model::OptionLabel;
use services::proctoring::CameraStatus;

use crate::vm::{QuestionVm, ResultVm};

use super::state::camera_label;

#[component]
pub(super) fn QuestionCard(
    question: QuestionVm,
    #[props(!optional)] selected: Option<OptionLabel>,
    disabled: bool,
    on_select: Callback<(usize, OptionLabel)>,
) -> Element {
    let index = question.index;
    let group = question.group_name();

    rsx! {
        fieldset { class: "quiz-question", disabled: disabled,
            legend { "{question.number}. {question.prompt}" }
            for option in question.options {
                label { class: "quiz-option", key: "{option.label}",
                    input {
                        r#type: "radio",
                        name: "{group}",
                        value: "{option.label}",
                        checked: selected == Some(option.label),
                        disabled: disabled,
                        onchange: move |_| on_select.call((index, option.label)),
                    }
                    span { class: "quiz-option-label", "{option.label}." }
                    " {option.text}"
                }
            }
        }
    }
}

#[component]
pub(super) fn CameraPanel(status: CameraStatus) -> Element {
    let label = camera_label(status);
    rsx! {
        div { class: "quiz-camera",
            video { id: "camera", autoplay: true, muted: true }
            span { class: "camera-status", "{label}" }
        }
    }
}

#[component]
pub(super) fn ResultPanel(result: ResultVm) -> Element {
    rsx! {
        if result.timed_out {
            p { class: "quiz-result-banner", "Time's up! Your answers were submitted automatically." }
        }
        p { class: "quiz-score",
            "Correct: {result.correct} | Wrong: {result.wrong} | Score: {result.percent}%"
        }
        p { class: "quiz-proctoring",
            "Time on tab: {result.tab_open_str} | Tab switches: {result.tab_switches}"
        }
        if !result.saved {
            p { class: "quiz-warning", "This result could not be saved to history." }
        }
    }
}
