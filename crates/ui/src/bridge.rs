//! Glue between the session (running on the tokio runtime) and the webview.
//!
//! The session talks to `UiRenderer` and `WebviewCamera`; both only push
//! messages into channels that the quiz view drains on the UI side.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::trace;

use quiz_core::countdown::TimerDisplay;
use quiz_core::model::{HistoryEntry, QuizSet};
use services::error::CameraError;
use services::proctoring::{CameraDevice, CameraStatus, CameraStream};
use services::{Renderer, SessionOutcome};

use crate::vm::{HistoryRowVm, QuestionVm, ResultVm, map_history_rows, map_questions};

/// A render instruction for the quiz view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiUpdate {
    Questions(Vec<QuestionVm>),
    Timer(String),
    Camera(CameraStatus),
    Results(ResultVm),
    History(Vec<HistoryRowVm>),
    Unanswered(Vec<usize>),
}

pub struct UiRenderer {
    updates: mpsc::UnboundedSender<UiUpdate>,
}

impl UiRenderer {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        (Self { updates }, rx)
    }

    fn send(&self, update: UiUpdate) {
        if self.updates.send(update).is_err() {
            trace!("quiz view gone, dropping render update");
        }
    }
}

impl Renderer for UiRenderer {
    fn render_questions(&self, quiz: &QuizSet) {
        self.send(UiUpdate::Questions(map_questions(quiz)));
    }

    fn render_timer(&self, display: TimerDisplay) {
        self.send(UiUpdate::Timer(display.to_string()));
    }

    fn render_camera(&self, status: CameraStatus) {
        self.send(UiUpdate::Camera(status));
    }

    fn render_results(&self, outcome: &SessionOutcome) {
        self.send(UiUpdate::Results(ResultVm::from(outcome)));
    }

    fn render_history(&self, history: &[HistoryEntry]) {
        self.send(UiUpdate::History(map_history_rows(history)));
    }

    fn prompt_unanswered(&self, unanswered: &[usize]) {
        self.send(UiUpdate::Unanswered(unanswered.to_vec()));
    }
}

/// Work for the webview's media script.
///
/// Every stream carries the id of the `Start` that opened it, so a late
/// `Stop` from a superseded session only touches its own stream.
#[derive(Debug)]
pub enum CameraRequest {
    Start {
        id: u64,
        reply: oneshot::Sender<Result<(), CameraError>>,
    },
    Stop {
        id: u64,
    },
}

/// Camera backed by `getUserMedia` in the webview, rendered into `#camera`.
#[derive(Clone)]
pub struct WebviewCamera {
    requests: mpsc::UnboundedSender<CameraRequest>,
    next_id: Arc<AtomicU64>,
}

impl WebviewCamera {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CameraRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        let camera = Self {
            requests,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (camera, rx)
    }
}

#[async_trait]
impl CameraDevice for WebviewCamera {
    async fn acquire(&self) -> Result<CameraStream, CameraError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, granted) = oneshot::channel();
        self.requests
            .send(CameraRequest::Start { id, reply })
            .map_err(|_| CameraError::Unavailable)?;
        granted.await.map_err(|_| CameraError::Unavailable)??;

        let requests = self.requests.clone();
        Ok(CameraStream::new(format!("webview-{id}"), move || {
            let _ = requests.send(CameraRequest::Stop { id });
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::time::Duration;

    use quiz_core::model::{OptionLabel, Question};
    use quiz_core::time::fixed_clock;
    use services::error::LoaderError;
    use services::loader::QuizSource;
    use services::session::NoopRenderer;
    use services::{AppServices, QuizConfig};
    use tokio::runtime::Handle;

    fn one_question() -> QuizSet {
        QuizSet::new(vec![
            Question::new("2+2?", ["3", "4", "5", "6"].map(str::to_string), OptionLabel::B)
                .unwrap(),
        ])
        .unwrap()
    }

    struct OneQuestion;

    #[async_trait]
    impl QuizSource for OneQuestion {
        async fn fetch(&self) -> Result<QuizSet, LoaderError> {
            Ok(one_question())
        }
    }

    /// Stand-in for the page's media script: streams keyed by request id,
    /// a new start stops whatever it replaces.
    #[derive(Default)]
    struct FakePage {
        live: BTreeSet<u64>,
        stops: BTreeMap<u64, u32>,
    }

    impl FakePage {
        fn start(&mut self, id: u64) {
            for old in std::mem::take(&mut self.live) {
                *self.stops.entry(old).or_default() += 1;
            }
            self.live.insert(id);
        }

        fn stop(&mut self, id: u64) {
            if self.live.remove(&id) {
                *self.stops.entry(id).or_default() += 1;
            }
        }
    }

    async fn next_request(
        requests: &mut mpsc::UnboundedReceiver<CameraRequest>,
    ) -> CameraRequest {
        tokio::time::timeout(Duration::from_secs(5), requests.recv())
            .await
            .expect("camera request in time")
            .expect("camera channel open")
    }

    #[test]
    fn renderer_forwards_view_models() {
        let (renderer, mut rx) = UiRenderer::channel();
        renderer.render_questions(&one_question());
        renderer.render_timer(TimerDisplay::Remaining(61));
        renderer.render_timer(TimerDisplay::Expired);
        renderer.prompt_unanswered(&[0]);

        assert!(matches!(rx.try_recv(), Ok(UiUpdate::Questions(q)) if q.len() == 1));
        assert_eq!(rx.try_recv().ok(), Some(UiUpdate::Timer("01:01".into())));
        assert_eq!(rx.try_recv().ok(), Some(UiUpdate::Timer("Time's up!".into())));
        assert_eq!(rx.try_recv().ok(), Some(UiUpdate::Unanswered(vec![0])));
    }

    #[test]
    fn renderer_survives_a_closed_view() {
        let (renderer, rx) = UiRenderer::channel();
        drop(rx);
        renderer.render_camera(CameraStatus::Live);
    }

    #[tokio::test]
    async fn webview_camera_round_trips_through_the_ui_side() {
        let (camera, mut requests) = WebviewCamera::channel();
        let ui = tokio::spawn(async move {
            let mut stops = Vec::new();
            while let Some(request) = requests.recv().await {
                match request {
                    CameraRequest::Start { reply, .. } => {
                        let _ = reply.send(Ok(()));
                    }
                    CameraRequest::Stop { id } => stops.push(id),
                }
            }
            stops
        });

        let first = camera.acquire().await.unwrap();
        let second = camera.acquire().await.unwrap();
        assert_eq!(first.label(), "webview-1");
        assert_eq!(second.label(), "webview-2");
        second.release();
        first.release();
        drop(camera);

        assert_eq!(ui.await.unwrap(), vec![2, 1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn restart_during_pending_grant_keeps_the_new_stream() {
        let (camera, mut requests) = WebviewCamera::channel();
        let services =
            AppServices::in_memory(QuizConfig::default(), Arc::new(OneQuestion), fixed_clock());
        let session = services.session(Handle::current(), Arc::new(NoopRenderer), Arc::new(camera));
        let mut page = FakePage::default();

        session.start().await.unwrap();
        let CameraRequest::Start { id: first, reply: first_reply } =
            next_request(&mut requests).await
        else {
            panic!("expected the first camera start");
        };

        // Restart while the first permission prompt is still open.
        session.start().await.unwrap();
        let CameraRequest::Start { id: second, reply: second_reply } =
            next_request(&mut requests).await
        else {
            panic!("expected the second camera start");
        };
        assert_ne!(first, second);

        // The page answers the first prompt, then serves the second start.
        page.start(first);
        first_reply.send(Ok(())).unwrap();
        page.start(second);
        second_reply.send(Ok(())).unwrap();

        // The superseded grant is handed back under its own id.
        let CameraRequest::Stop { id } = next_request(&mut requests).await else {
            panic!("expected the stale stream to be released");
        };
        assert_eq!(id, first);
        page.stop(id);

        for _ in 0..100 {
            if session.camera_status() == CameraStatus::Live {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(session.camera_status(), CameraStatus::Live);
        assert_eq!(page.live.iter().copied().collect::<Vec<_>>(), vec![second]);
        assert_eq!(page.stops.get(&first), Some(&1));
        assert_eq!(page.stops.get(&second), None);

        session.shutdown();
        let CameraRequest::Stop { id } = next_request(&mut requests).await else {
            panic!("expected the live stream to be released on shutdown");
        };
        assert_eq!(id, second);
        page.stop(id);
        assert!(page.live.is_empty());
        assert_eq!(page.stops.get(&first), Some(&1));
        assert_eq!(page.stops.get(&second), Some(&1));
    }

    #[tokio::test]
    async fn webview_camera_reports_denial_and_missing_ui() {
        let (camera, mut requests) = WebviewCamera::channel();
        let ui = tokio::spawn(async move {
            if let Some(CameraRequest::Start { reply, .. }) = requests.recv().await {
                let _ = reply.send(Err(CameraError::PermissionDenied("NotAllowedError".into())));
            }
        });
        assert!(matches!(
            camera.acquire().await,
            Err(CameraError::PermissionDenied(_))
        ));
        ui.await.unwrap();

        assert!(matches!(
            camera.acquire().await,
            Err(CameraError::Unavailable)
        ));
    }
}
