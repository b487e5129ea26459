use std::sync::Arc;

use services::proctoring::CameraDevice;
use services::{HistoryStore, QuizSession, Renderer};

pub trait UiApp: Send + Sync {
    /// A fresh session that renders through `renderer` and proctors with `camera`.
    fn new_session(
        &self,
        renderer: Arc<dyn Renderer>,
        camera: Arc<dyn CameraDevice>,
    ) -> QuizSession;

    fn history(&self) -> HistoryStore;
    fn duration_secs(&self) -> u32;
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    history: HistoryStore,
    duration_secs: u32,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            history: app.history(),
            duration_secs: app.duration_secs(),
            app: Arc::clone(app),
        }
    }

    #[must_use]
    pub fn new_session(
        &self,
        renderer: Arc<dyn Renderer>,
        camera: Arc<dyn CameraDevice>,
    ) -> QuizSession {
        self.app.new_session(renderer, camera)
    }

    #[must_use]
    pub fn history(&self) -> HistoryStore {
        self.history.clone()
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
