use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::timer::TICK;

/// Page visibility as reported by the host window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Counts seconds on the quiz tab and detects switches away from it.
///
/// Seconds are counted for the whole tracking window regardless of
/// visibility; `visibility_changed` reports each visible → hidden edge.
pub struct TabTracker {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
    visibility: Visibility,
}

impl TabTracker {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
            visibility: Visibility::Visible,
        }
    }

    /// Begin tracking; `on_second` runs once per elapsed second.
    pub fn start<F>(&mut self, on_second: F)
    where
        F: Fn() + Send + 'static,
    {
        self.stop();
        self.visibility = Visibility::Visible;
        self.task = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_second();
            }
        }));
    }

    /// Record a visibility change. Returns `true` when it counts as a tab switch.
    pub fn visibility_changed(&mut self, next: Visibility) -> bool {
        let previous = std::mem::replace(&mut self.visibility, next);
        self.is_tracking() && previous == Visibility::Visible && next == Visibility::Hidden
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.task.is_some()
    }

    /// Stop counting. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TabTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn counts_seconds_regardless_of_visibility() {
        let seconds = Arc::new(AtomicU32::new(0));
        let mut tracker = TabTracker::new(Handle::current());
        let s = Arc::clone(&seconds);
        tracker.start(move || {
            s.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(tracker.visibility_changed(Visibility::Hidden));
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!tracker.visibility_changed(Visibility::Visible));
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(seconds.load(Ordering::SeqCst), 7);

        tracker.stop();
        tracker.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(seconds.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn only_visible_to_hidden_edges_count_as_switches() {
        let mut tracker = TabTracker::new(Handle::current());
        assert!(!tracker.visibility_changed(Visibility::Hidden));
        tracker.visibility_changed(Visibility::Visible);

        tracker.start(|| {});
        assert!(tracker.visibility_changed(Visibility::Hidden));
        assert!(!tracker.visibility_changed(Visibility::Hidden));
        assert!(!tracker.visibility_changed(Visibility::Visible));
        assert!(tracker.visibility_changed(Visibility::Hidden));
        assert_eq!(tracker.visibility(), Visibility::Hidden);
    }
}
