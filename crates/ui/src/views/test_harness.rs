use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use tokio::runtime::Handle;

use quiz_core::model::{OptionLabel, Question, QuizSet};
use quiz_core::time::fixed_clock;
use services::error::LoaderError;
use services::loader::QuizSource;
use services::proctoring::CameraDevice;
use services::{AppServices, HistoryStore, QuizConfig, QuizSession, Renderer};

use crate::context::{UiApp, build_app_context};
use crate::views::{HistoryView, QuizView};

struct FixedQuiz;

#[async_trait]
impl QuizSource for FixedQuiz {
    async fn fetch(&self) -> Result<QuizSet, LoaderError> {
        let question = Question::new(
            "2+2?",
            ["3", "4", "5", "6"].map(str::to_string),
            OptionLabel::B,
        )
        .unwrap();
        Ok(QuizSet::new(vec![question]).unwrap())
    }
}

struct TestApp {
    services: AppServices,
    runtime: Handle,
}

impl UiApp for TestApp {
    fn new_session(
        &self,
        renderer: Arc<dyn Renderer>,
        camera: Arc<dyn CameraDevice>,
    ) -> QuizSession {
        self.services.session(self.runtime.clone(), renderer, camera)
    }

    fn history(&self) -> HistoryStore {
        self.services.history()
    }

    fn duration_secs(&self) -> u32 {
        self.services.config().duration_secs
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Quiz,
    History,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::History => rsx! { HistoryView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub history: HistoryStore,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned tasks and resources settle for a few rounds.
    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over in-memory storage with a one-question quiz.
pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let services = AppServices::in_memory(QuizConfig::default(), Arc::new(FixedQuiz), fixed_clock());
    let history = services.history();
    let app = Arc::new(TestApp {
        services,
        runtime: Handle::current(),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, history }
}
