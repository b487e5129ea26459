mod controller;
mod renderer;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{QuizSession, SessionDeps, SessionOutcome, SubmitTrigger};
pub use renderer::{NoopRenderer, Renderer};
