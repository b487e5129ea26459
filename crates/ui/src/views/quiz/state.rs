use dioxus::prelude::*;

use quiz_core::countdown::format_mm_ss;
use quiz_core::model::{OptionLabel, SessionPhase};
use services::proctoring::CameraStatus;

use crate::bridge::UiUpdate;
use crate::vm::{HistoryRowVm, QuestionVm, ResultVm, unanswered_notice};

/// Everything the quiz page draws. Written by the render bridge and by the
/// page's own handlers.
#[derive(Clone, Copy)]
pub(super) struct QuizSignals {
    pub phase: Signal<SessionPhase>,
    pub questions: Signal<Vec<QuestionVm>>,
    pub selections: Signal<Vec<Option<OptionLabel>>>,
    pub timer: Signal<String>,
    pub camera: Signal<CameraStatus>,
    pub result: Signal<Option<ResultVm>>,
    pub history: Signal<Vec<HistoryRowVm>>,
    pub notice: Signal<Option<String>>,
}

pub(super) fn use_quiz_signals(duration_secs: u32) -> QuizSignals {
    QuizSignals {
        phase: use_signal(SessionPhase::default),
        questions: use_signal(Vec::new),
        selections: use_signal(Vec::new),
        timer: use_signal(|| format_mm_ss(duration_secs)),
        camera: use_signal(CameraStatus::default),
        result: use_signal(|| None),
        history: use_signal(Vec::new),
        notice: use_signal(|| None),
    }
}

impl QuizSignals {
    pub fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Questions(questions) => {
                self.selections.set(vec![None; questions.len()]);
                self.questions.set(questions);
                self.result.set(None);
                self.notice.set(None);
            }
            UiUpdate::Timer(text) => self.timer.set(text),
            UiUpdate::Camera(status) => self.camera.set(status),
            UiUpdate::Results(result) => {
                self.phase.set(SessionPhase::Submitted);
                self.result.set(Some(result));
                self.notice.set(None);
            }
            UiUpdate::History(rows) => self.history.set(rows),
            UiUpdate::Unanswered(unanswered) => {
                self.notice.set(Some(unanswered_notice(&unanswered)));
            }
        }
    }

    /// Clear the page for a new attempt.
    pub fn begin_loading(&mut self) {
        self.phase.set(SessionPhase::Loading);
        self.questions.set(Vec::new());
        self.selections.set(Vec::new());
        self.result.set(None);
        self.notice.set(None);
    }

    pub fn select(&mut self, index: usize, label: OptionLabel) {
        if let Some(slot) = self.selections.write().get_mut(index) {
            *slot = Some(label);
        }
    }
}

pub(super) fn camera_label(status: CameraStatus) -> &'static str {
    match status {
        CameraStatus::Off => "Camera off",
        CameraStatus::Requesting => "Requesting camera...",
        CameraStatus::Live => "Camera on",
        CameraStatus::Unavailable => "Camera unavailable",
    }
}
