use std::fmt;

use async_trait::async_trait;

use crate::error::CameraError;

/// Host capability that can open a video-only stream.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Ask the host for a video stream.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::Unavailable` when the host has no camera and
    /// `CameraError::PermissionDenied` when the user refuses access.
    async fn acquire(&self) -> Result<CameraStream, CameraError>;
}

/// Live camera stream. Released exactly once, on `release` or drop.
pub struct CameraStream {
    label: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl CameraStream {
    pub fn new(label: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            label: label.into(),
            release: Some(Box::new(release)),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Stop all tracks of the stream.
    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for CameraStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraStream")
            .field("label", &self.label)
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Host without any camera.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

#[async_trait]
impl CameraDevice for NoCamera {
    async fn acquire(&self) -> Result<CameraStream, CameraError> {
        Err(CameraError::Unavailable)
    }
}
