use quiz_core::countdown::TimerDisplay;
use quiz_core::model::{HistoryEntry, QuizSet};

use crate::proctoring::CameraStatus;
use crate::sessions::SessionOutcome;

/// Rendering surface driven by the session.
///
/// Calls arrive from the session's tasks and must not call back into the
/// session synchronously.
pub trait Renderer: Send + Sync {
    fn render_questions(&self, quiz: &QuizSet);
    fn render_timer(&self, display: TimerDisplay);
    fn render_camera(&self, status: CameraStatus);
    fn render_results(&self, outcome: &SessionOutcome);
    fn render_history(&self, history: &[HistoryEntry]);
    /// Ask the user to answer the listed (zero-based) questions before submitting.
    fn prompt_unanswered(&self, unanswered: &[usize]);
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render_questions(&self, _quiz: &QuizSet) {}
    fn render_timer(&self, _display: TimerDisplay) {}
    fn render_camera(&self, _status: CameraStatus) {}
    fn render_results(&self, _outcome: &SessionOutcome) {}
    fn render_history(&self, _history: &[HistoryEntry]) {}
    fn prompt_unanswered(&self, _unanswered: &[usize]) {}
}
