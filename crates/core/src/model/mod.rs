mod answers;
mod history;
mod question;
mod quiz;
mod session;

pub use answers::{AnswerError, AnswerSheet};
pub use history::{HistoryEntry, HistoryLog};
pub use question::{OptionLabel, Question, QuestionError};
pub use quiz::{QuizSet, QuizSetError};
pub use session::{DEFAULT_DURATION_SECS, ScoreTally, SessionPhase, SessionState};
