mod history_vm;
mod quiz_vm;
mod time_fmt;

pub use history_vm::{HistoryRowVm, map_history_rows};
pub use quiz_vm::{OptionVm, QuestionVm, ResultVm, map_questions, unanswered_notice};
pub use time_fmt::{format_datetime, format_duration};
