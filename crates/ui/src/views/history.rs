use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{HistoryRowVm, map_history_rows};

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();

    let resource = use_resource(move || {
        let history = history.clone();
        async move { map_history_rows(&history.read_all().await) }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    HistoryTable { rows }
                },
            }
        }
    }
}

/// Past attempts, oldest first.
#[component]
pub fn HistoryTable(rows: Vec<HistoryRowVm>) -> Element {
    if rows.is_empty() {
        return rsx! {
            p { class: "history-empty", "No quiz attempts yet." }
        };
    }

    rsx! {
        table { class: "history-table",
            thead {
                tr {
                    th { "#" }
                    th { "Correct" }
                    th { "Wrong" }
                    th { "Score" }
                    th { "Time on tab" }
                    th { "Tab switches" }
                    th { "Completed" }
                }
            }
            tbody {
                for row in rows {
                    tr { key: "{row.number}",
                        td { "{row.number}" }
                        td { "{row.correct}" }
                        td { "{row.wrong}" }
                        td { "{row.percent}%" }
                        td { "{row.tab_open_str}" }
                        td { "{row.tab_switches}" }
                        td { "{row.completed_at_str}" }
                    }
                }
            }
        }
    }
}
