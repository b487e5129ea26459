use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tracing::{debug, error, info};

use quiz_core::Clock;
use quiz_core::countdown::TimerDisplay;
use quiz_core::input::{InputPolicy, InputVerdict, KeyCombo};
use quiz_core::model::{
    AnswerSheet, DEFAULT_DURATION_SECS, HistoryEntry, HistoryLog, OptionLabel, QuizSet,
    ScoreTally, SessionPhase, SessionState,
};

use crate::error::SessionError;
use crate::history::HistoryStore;
use crate::loader::QuizSource;
use crate::proctoring::{
    CameraDevice, CameraStatus, NoCamera, ProctoringMonitor, Visibility,
};
use crate::sessions::renderer::{NoopRenderer, Renderer};
use crate::timer::{TimerService, TimerState};

//
// ─── OUTCOME ──────────────────────────────────────────────────────────────────
//

/// What ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    User,
    Timer,
}

/// Final result of a submitted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub trigger: SubmitTrigger,
    pub entry: HistoryEntry,
    /// False when the history append failed; the result itself still stands.
    pub history_saved: bool,
}

impl SessionOutcome {
    #[must_use]
    pub fn tally(&self) -> ScoreTally {
        self.entry.tally()
    }
}

//
// ─── DEPENDENCIES ─────────────────────────────────────────────────────────────
//

/// Collaborators of a quiz session.
#[derive(Clone)]
pub struct SessionDeps {
    runtime: Handle,
    source: Arc<dyn QuizSource>,
    history: HistoryStore,
    camera: Arc<dyn CameraDevice>,
    renderer: Arc<dyn Renderer>,
    clock: Clock,
    duration_secs: u32,
}

impl SessionDeps {
    /// Defaults: no camera, no rendering, system clock, five minutes.
    #[must_use]
    pub fn new(runtime: Handle, source: Arc<dyn QuizSource>, history: HistoryStore) -> Self {
        Self {
            runtime,
            source,
            history,
            camera: Arc::new(NoCamera),
            renderer: Arc::new(NoopRenderer),
            clock: Clock::system(),
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    #[must_use]
    pub fn with_camera(mut self, camera: Arc<dyn CameraDevice>) -> Self {
        self.camera = camera;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

struct SessionInner {
    state: SessionState,
    quiz: Option<QuizSet>,
    answers: AnswerSheet,
    timer: TimerService,
    monitor: ProctoringMonitor,
    /// Bumped on every `start`; callbacks from older sessions compare and bail.
    generation: u64,
}

impl SessionInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.state.phase.is_active()
    }

    fn stop_side_effects(&mut self) {
        self.timer.stop();
        self.monitor.teardown();
    }
}

struct Shared {
    deps: SessionDeps,
    inner: Mutex<SessionInner>,
}

/// Session controller: owns the state machine Idle → Loading → Active → Submitted.
///
/// Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct QuizSession {
    shared: Arc<Shared>,
}

impl QuizSession {
    #[must_use]
    pub fn new(deps: SessionDeps) -> Self {
        let inner = SessionInner {
            state: SessionState::reset(deps.duration_secs),
            quiz: None,
            answers: AnswerSheet::default(),
            timer: TimerService::new(deps.runtime.clone()),
            monitor: ProctoringMonitor::new(deps.runtime.clone(), Arc::clone(&deps.camera)),
            generation: 0,
        };
        Self {
            shared: Arc::new(Shared {
                deps,
                inner: Mutex::new(inner),
            }),
        }
    }

    /// Reset the session and load a fresh quiz.
    ///
    /// On success the session is `Active`, the questions are rendered and the
    /// timer and proctoring monitor run. Calling `start` again restarts.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DataUnavailable` when no quiz could be loaded
    /// (the session is back in `Idle` and nothing was rendered), or
    /// `SessionError::Superseded` if another `start` began meanwhile.
    pub async fn start(&self) -> Result<QuizSet, SessionError> {
        let duration = self.shared.deps.duration_secs;
        let generation = {
            let mut inner = self.lock();
            inner.stop_side_effects();
            inner.generation = inner.generation.wrapping_add(1);
            inner.state = SessionState::reset(duration);
            inner.state.phase = SessionPhase::Loading;
            inner.quiz = None;
            inner.answers = AnswerSheet::default();
            inner.generation
        };
        info!(generation, "loading quiz");

        let fetched = self.shared.deps.source.fetch().await;

        let quiz = {
            let mut inner = self.lock();
            if inner.generation != generation {
                return Err(SessionError::Superseded);
            }
            match fetched {
                Ok(quiz) => {
                    inner.answers = quiz.blank_sheet();
                    inner.quiz = Some(quiz.clone());
                    inner.state.phase = SessionPhase::Active;
                    self.start_side_effects(&mut inner, generation);
                    quiz
                }
                Err(err) => {
                    inner.state.phase = SessionPhase::Idle;
                    error!(error = %err, "quiz data unavailable, staying idle");
                    return Err(SessionError::DataUnavailable(err));
                }
            }
        };
        info!(generation, questions = quiz.len(), "quiz active");

        let renderer = &self.shared.deps.renderer;
        renderer.render_questions(&quiz);
        renderer.render_timer(TimerDisplay::Remaining(duration));
        renderer.render_camera(CameraStatus::Requesting);
        Ok(quiz)
    }

    /// Record the user's choice for question `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` outside `Active` and
    /// `SessionError::Answer` for an unknown question.
    pub fn select(&self, index: usize, label: OptionLabel) -> Result<(), SessionError> {
        let mut inner = self.lock();
        let phase = inner.state.phase;
        if !phase.is_active() {
            return Err(SessionError::NotActive { phase });
        }
        inner.answers.select(index, label)?;
        Ok(())
    }

    /// Submit the current answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ValidationFailed` if any question is unanswered;
    /// the session then stays `Active` and nothing changes. Returns
    /// `SessionError::NotActive` if there is no active session.
    pub async fn submit(&self) -> Result<SessionOutcome, SessionError> {
        self.finish(SubmitTrigger::User, None).await
    }

    /// Timer-driven submit for the session started as `generation`.
    /// Unanswered questions count as wrong.
    async fn expire(&self, generation: u64) -> Result<SessionOutcome, SessionError> {
        self.finish(SubmitTrigger::Timer, Some(generation)).await
    }

    async fn finish(
        &self,
        trigger: SubmitTrigger,
        expected: Option<u64>,
    ) -> Result<SessionOutcome, SessionError> {
        let renderer = Arc::clone(&self.shared.deps.renderer);
        let entry = match self.close(trigger, expected) {
            Err(SessionError::ValidationFailed { unanswered }) => {
                debug!(?unanswered, "submit blocked, questions unanswered");
                renderer.prompt_unanswered(&unanswered);
                return Err(SessionError::ValidationFailed { unanswered });
            }
            other => other?,
        };

        let history = &self.shared.deps.history;
        let history_saved = match history.append(entry.clone()).await {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "could not save session to history");
                false
            }
        };

        let outcome = SessionOutcome {
            trigger,
            entry,
            history_saved,
        };
        info!(
            ?trigger,
            correct = outcome.entry.correct_count,
            wrong = outcome.entry.wrong_count,
            tab_switches = outcome.entry.tab_switch_count,
            "quiz submitted"
        );

        renderer.render_results(&outcome);
        renderer.render_history(&history.read_all().await);
        Ok(outcome)
    }

    /// Score and close the active session. Timer and monitor are stopped on
    /// every successful path.
    fn close(
        &self,
        trigger: SubmitTrigger,
        expected: Option<u64>,
    ) -> Result<HistoryEntry, SessionError> {
        let mut inner = self.lock();
        if expected.is_some_and(|generation| generation != inner.generation) {
            return Err(SessionError::Superseded);
        }
        let phase = inner.state.phase;
        if !phase.is_active() {
            return Err(SessionError::NotActive { phase });
        }

        let tally = {
            let quiz = inner
                .quiz
                .as_ref()
                .ok_or(SessionError::NotActive { phase })?;
            if trigger == SubmitTrigger::User {
                let unanswered = inner.answers.unanswered();
                if !unanswered.is_empty() {
                    return Err(SessionError::ValidationFailed { unanswered });
                }
            }
            quiz.score(&inner.answers)
        };

        inner.stop_side_effects();
        inner.state.correct_count = tally.correct;
        inner.state.wrong_count = tally.wrong;
        inner.state.phase = SessionPhase::Submitted;

        Ok(HistoryEntry::from_state(
            &inner.state,
            self.shared.deps.clock.now(),
        ))
    }

    /// Forward a host visibility change; hiding the tab counts a switch.
    pub fn visibility_changed(&self, visibility: Visibility) {
        let mut inner = self.lock();
        if !inner.state.phase.is_active() {
            return;
        }
        if inner.monitor.visibility_changed(visibility) {
            inner.state.tab_switch_count = inner.state.tab_switch_count.saturating_add(1);
            info!(switches = inner.state.tab_switch_count, "tab hidden during quiz");
        }
    }

    /// Whether a key press should be swallowed.
    #[must_use]
    pub fn check_input(&self, combo: &KeyCombo) -> InputVerdict {
        self.lock().monitor.check_input(combo)
    }

    #[must_use]
    pub fn blocks_context_menu(&self) -> bool {
        self.lock().monitor.blocks_context_menu()
    }

    #[must_use]
    pub fn input_policy(&self) -> InputPolicy {
        self.lock().monitor.input_policy()
    }

    /// Read the stored history and hand it to the renderer.
    pub async fn load_history(&self) -> HistoryLog {
        let history = self.shared.deps.history.read_all().await;
        self.shared.deps.renderer.render_history(&history);
        history
    }

    /// Stop the timer and release proctoring resources without submitting.
    /// Used when the host window goes away.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        inner.stop_side_effects();
        debug!(phase = ?inner.state.phase, "session shut down");
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.lock().state.phase
    }

    #[must_use]
    pub fn quiz(&self) -> Option<QuizSet> {
        self.lock().quiz.clone()
    }

    #[must_use]
    pub fn answers(&self) -> AnswerSheet {
        self.lock().answers.clone()
    }

    #[must_use]
    pub fn timer_state(&self) -> TimerState {
        self.lock().timer.state()
    }

    #[must_use]
    pub fn camera_status(&self) -> CameraStatus {
        self.lock().monitor.camera_status()
    }

    fn start_side_effects(&self, inner: &mut SessionInner, generation: u64) {
        let weak = Arc::downgrade(&self.shared);
        let runtime = self.shared.deps.runtime.clone();

        let on_tick = {
            let weak = Weak::clone(&weak);
            move |display| {
                if let Some(session) = upgrade(&weak) {
                    session.apply_tick(generation, display);
                }
            }
        };
        let on_expire = {
            let weak = Weak::clone(&weak);
            move || {
                let Some(session) = upgrade(&weak) else {
                    return;
                };
                info!(generation, "time is up, submitting");
                runtime.spawn(async move {
                    if let Err(err) = session.expire(generation).await {
                        debug!(error = %err, "timer submit skipped");
                    }
                });
            }
        };
        inner
            .timer
            .start(self.shared.deps.duration_secs, on_tick, on_expire);

        let on_second = {
            let weak = Weak::clone(&weak);
            move || {
                if let Some(session) = upgrade(&weak) {
                    let mut inner = session.lock();
                    if inner.is_current(generation) {
                        inner.state.tab_open_seconds =
                            inner.state.tab_open_seconds.saturating_add(1);
                    }
                }
            }
        };
        let on_camera = move |status| {
            let Some(session) = upgrade(&weak) else {
                return;
            };
            let current = session.lock().is_current(generation);
            if current {
                session.shared.deps.renderer.render_camera(status);
            }
        };
        inner.monitor.start(on_second, on_camera);
    }

    fn apply_tick(&self, generation: u64, display: TimerDisplay) {
        {
            let mut inner = self.lock();
            if !inner.is_current(generation) {
                return;
            }
            inner.state.seconds_remaining = match display {
                TimerDisplay::Remaining(secs) => secs,
                TimerDisplay::Expired => 0,
            };
        }
        self.shared.deps.renderer.render_timer(display);
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn upgrade(weak: &Weak<Shared>) -> Option<QuizSession> {
    weak.upgrade().map(|shared| QuizSession { shared })
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("QuizSession")
            .field("phase", &inner.state.phase)
            .field("generation", &inner.generation)
            .field("questions", &inner.quiz.as_ref().map(QuizSet::len))
            .field("seconds_remaining", &inner.state.seconds_remaining)
            .finish_non_exhaustive()
    }
}
