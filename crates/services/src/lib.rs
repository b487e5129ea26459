#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod history;
pub mod loader;
pub mod proctoring;
pub mod sessions;
pub mod timer;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::{AppServices, QuizOrigin};
pub use config::QuizConfig;
pub use error::{AppServicesError, CameraError, LoaderError, SessionError};
pub use history::HistoryStore;
pub use sessions::{QuizSession, Renderer, SessionDeps, SessionOutcome, SubmitTrigger};
