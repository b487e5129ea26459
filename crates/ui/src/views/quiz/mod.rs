mod components;
mod keys;
mod scripts;
mod state;

use std::sync::Arc;

use dioxus::document::eval;
use dioxus::prelude::*;
use tracing::{debug, trace};

use quiz_core::input::InputVerdict;
use quiz_core::model::{OptionLabel, SessionPhase};
use services::SessionError;

use crate::bridge::{UiRenderer, WebviewCamera};
use crate::context::AppContext;
use crate::views::HistoryTable;

use components::{CameraPanel, QuestionCard, ResultPanel};
use keys::combo_from_key;
use scripts::{CAMERA_STOP_ALL, input_guard_script, serve_camera, watch_visibility};
use state::use_quiz_signals;

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut signals = use_quiz_signals(ctx.duration_secs());

    let session = use_hook(|| {
        let (renderer, mut updates) = UiRenderer::channel();
        let (camera, camera_requests) = WebviewCamera::channel();
        let session = ctx.new_session(Arc::new(renderer), Arc::new(camera));

        spawn(async move {
            while let Some(update) = updates.recv().await {
                signals.apply(update);
            }
        });
        spawn(serve_camera(camera_requests));
        spawn(watch_visibility(session.clone()));

        let history_session = session.clone();
        spawn(async move {
            history_session.load_history().await;
        });
        session
    });

    use_drop({
        let session = session.clone();
        move || {
            session.shutdown();
            let _ = eval(CAMERA_STOP_ALL);
        }
    });

    {
        let session = session.clone();
        use_effect(move || {
            let phase = (signals.phase)();
            trace!(?phase, "refreshing input guard");
            let _ = eval(&input_guard_script(&session.input_policy()));
        });
    }

    let on_select = {
        let session = session.clone();
        use_callback(move |(index, label): (usize, OptionLabel)| {
            match session.select(index, label) {
                Ok(()) => signals.select(index, label),
                Err(err) => debug!(error = %err, "selection ignored"),
            }
        })
    };

    let on_start = {
        let session = session.clone();
        move |_: MouseEvent| {
            let session = session.clone();
            signals.begin_loading();
            spawn(async move {
                let started = session.start().await;
                if let Err(err) = &started {
                    debug!(error = %err, "quiz did not start");
                }
                if !matches!(started, Err(SessionError::Superseded)) {
                    signals.phase.set(session.phase());
                }
            });
        }
    };

    let on_submit = {
        let session = session.clone();
        move |_: MouseEvent| {
            let session = session.clone();
            spawn(async move {
                match session.submit().await {
                    Ok(_) => signals.phase.set(SessionPhase::Submitted),
                    Err(SessionError::ValidationFailed { .. }) => {}
                    Err(err) => debug!(error = %err, "submit ignored"),
                }
            });
        }
    };

    let on_key = {
        let session = session.clone();
        move |evt: KeyboardEvent| {
            let Some(combo) = combo_from_key(&evt.data.key(), evt.data.modifiers()) else {
                return;
            };
            if let InputVerdict::Block(reason) = session.check_input(&combo) {
                evt.prevent_default();
                debug!(%combo, ?reason, "blocked key combination");
                signals
                    .notice
                    .set(Some(format!("{combo} is disabled during the quiz.")));
            }
        }
    };

    let on_context_menu = {
        let session = session.clone();
        move |evt: MouseEvent| {
            if session.blocks_context_menu() {
                evt.prevent_default();
            }
        }
    };

    let phase = (signals.phase)();
    let active = phase.is_active();
    let start_label = if phase == SessionPhase::Idle {
        "Start quiz"
    } else {
        "Restart quiz"
    };
    let timer = signals.timer.read().clone();
    let camera = (signals.camera)();
    let notice = signals.notice.read().clone();
    let result = signals.result.read().clone();
    let history = signals.history.read().clone();
    let cards = {
        let selections = signals.selections.read();
        signals
            .questions
            .read()
            .iter()
            .map(|question| {
                let selected = selections.get(question.index).copied().flatten();
                (question.index, question.clone(), selected)
            })
            .collect::<Vec<_>>()
    };

    rsx! {
        div {
            class: "page page--quiz",
            id: "quiz-root",
            tabindex: "0",
            onkeydown: on_key,
            oncontextmenu: on_context_menu,

            div { class: "quiz-toolbar",
                h2 { "Quiz" }
                span { id: "time", class: "quiz-timer", "{timer}" }
                button {
                    id: "start",
                    class: "btn btn-primary",
                    disabled: phase == SessionPhase::Loading,
                    onclick: on_start,
                    "{start_label}"
                }
            }

            CameraPanel { status: camera }

            if let Some(notice) = notice {
                p { class: "quiz-notice", role: "alert", "{notice}" }
            }

            div { id: "quiz-box", class: "quiz-box",
                for (key, question, selected) in cards {
                    QuestionCard {
                        key: "{key}",
                        question: question,
                        selected: selected,
                        disabled: !active,
                        on_select: on_select,
                    }
                }
            }

            button {
                id: "submit",
                class: "btn",
                disabled: !active,
                onclick: on_submit,
                "Submit"
            }

            div { id: "result", class: "quiz-result",
                if let Some(result) = result {
                    ResultPanel { result }
                }
            }

            div { id: "history", class: "quiz-history",
                h3 { "Previous attempts" }
                HistoryTable { rows: history }
            }
        }
    }
}
