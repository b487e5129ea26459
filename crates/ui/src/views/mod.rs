mod history;
mod quiz;
mod state;

pub use history::{HistoryTable, HistoryView};
pub use quiz::QuizView;
pub use state::{ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
