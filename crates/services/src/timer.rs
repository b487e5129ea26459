//! Timer Service: drives a `Countdown` once per second on the tokio runtime.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use quiz_core::countdown::{Countdown, Tick, TimerDisplay};

pub(crate) const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
    Expired,
}

/// Owns at most one ticking task. `start` replaces any running countdown.
pub struct TimerService {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
    state: Arc<Mutex<TimerState>>,
}

impl TimerService {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
            state: Arc::new(Mutex::new(TimerState::Stopped)),
        }
    }

    /// Start counting down from `duration_secs`.
    ///
    /// `on_tick` receives every display update, including the final
    /// `TimerDisplay::Expired`; `on_expire` runs once right after it.
    pub fn start<T, E>(&mut self, duration_secs: u32, on_tick: T, on_expire: E)
    where
        T: Fn(TimerDisplay) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.stop();
        set_state(&self.state, TimerState::Running);

        let state = Arc::clone(&self.state);
        self.task = Some(self.runtime.spawn(async move {
            let mut countdown = Countdown::new(duration_secs);
            let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                match countdown.tick() {
                    Tick::Remaining(secs) => on_tick(TimerDisplay::Remaining(secs)),
                    Tick::Expired => {
                        set_state(&state, TimerState::Expired);
                        on_tick(TimerDisplay::Expired);
                        on_expire();
                        break;
                    }
                    Tick::Idle => break,
                }
            }
        }));
    }

    /// Cancel the ticking task. Safe to call at any time.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == TimerState::Running {
                *state = TimerState::Stopped;
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn set_state(state: &Mutex<TimerState>, next: TimerState) {
    *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
}
