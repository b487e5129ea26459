//! Quiz Loader: fetches the question set and normalizes it.

mod wire;

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use quiz_core::model::QuizSet;

use crate::error::LoaderError;

pub use wire::{WRAPPER_KEY, normalize_payload, normalize_record};

/// Anything that can produce a question set.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Fetch and normalize the current question set.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError` when the data is unavailable, empty, or malformed.
    async fn fetch(&self) -> Result<QuizSet, LoaderError>;
}

/// Loads questions with an HTTP GET against a JSON endpoint.
#[derive(Clone, Debug)]
pub struct HttpQuizSource {
    client: Client,
    endpoint: String,
}

impl HttpQuizSource {
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QuizSource for HttpQuizSource {
    async fn fetch(&self) -> Result<QuizSet, LoaderError> {
        debug!(endpoint = %self.endpoint, "fetching quiz");
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(LoaderError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;
        Ok(normalize_payload(&payload)?)
    }
}

/// Loads questions from a JSON file on disk, in either accepted shape.
#[derive(Clone, Debug)]
pub struct FileQuizSource {
    path: PathBuf,
}

impl FileQuizSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuizSource for FileQuizSource {
    async fn fetch(&self) -> Result<QuizSet, LoaderError> {
        debug!(path = %self.path.display(), "reading quiz file");
        let body = tokio::fs::read(&self.path).await?;
        let payload: Value = serde_json::from_slice(&body)?;
        Ok(normalize_payload(&payload)?)
    }
}
