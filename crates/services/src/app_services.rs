use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::info;

use storage::repository::Storage;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::history::HistoryStore;
use crate::loader::{FileQuizSource, HttpQuizSource, QuizSource};
use crate::proctoring::CameraDevice;
use crate::sessions::{QuizSession, Renderer, SessionDeps};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the question set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOrigin {
    Http(String),
    File(PathBuf),
}

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    config: QuizConfig,
    source: Arc<dyn QuizSource>,
    history: HistoryStore,
    clock: Clock,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: QuizConfig,
        origin: QuizOrigin,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let source = build_source(origin)?;
        info!(db_url, endpoint = %config.endpoint, "app services ready");
        Ok(Self::with_parts(config, source, storage, clock))
    }

    /// Build services over in-memory storage, for tests and previews.
    #[must_use]
    pub fn in_memory(config: QuizConfig, source: Arc<dyn QuizSource>, clock: Clock) -> Self {
        Self::with_parts(config, source, Storage::in_memory(), clock)
    }

    fn with_parts(
        config: QuizConfig,
        source: Arc<dyn QuizSource>,
        storage: Storage,
        clock: Clock,
    ) -> Self {
        let history = HistoryStore::new(storage.slots, config.history_key.clone());
        Self {
            config,
            source,
            history,
            clock,
        }
    }

    /// A new session wired to this app's source, history and clock.
    #[must_use]
    pub fn session(
        &self,
        runtime: Handle,
        renderer: Arc<dyn Renderer>,
        camera: Arc<dyn CameraDevice>,
    ) -> QuizSession {
        let deps = SessionDeps::new(runtime, Arc::clone(&self.source), self.history.clone())
            .with_renderer(renderer)
            .with_camera(camera)
            .with_clock(self.clock)
            .with_duration(self.config.duration_secs);
        QuizSession::new(deps)
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> HistoryStore {
        self.history.clone()
    }
}

fn build_source(origin: QuizOrigin) -> Result<Arc<dyn QuizSource>, AppServicesError> {
    Ok(match origin {
        QuizOrigin::Http(endpoint) => {
            let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
            Arc::new(HttpQuizSource::new(client, endpoint))
        }
        QuizOrigin::File(path) => Arc::new(FileQuizSource::new(path)),
    })
}
