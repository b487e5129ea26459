//! Pure countdown logic behind the session timer.
//!
//! The async timer in `services` only drives `Countdown::tick` once per second;
//! everything observable about the countdown lives here.

use std::fmt;

/// Text shown in place of the clock once time has run out.
pub const EXPIRED_MARKER: &str = "Time's up!";

/// What the timer element should show after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDisplay {
    Remaining(u32),
    Expired,
}

impl fmt::Display for TimerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerDisplay::Remaining(secs) => f.write_str(&format_mm_ss(*secs)),
            TimerDisplay::Expired => f.write_str(EXPIRED_MARKER),
        }
    }
}

/// Formats seconds as zero-padded `MM:SS`. Minutes are not capped at 59.
#[must_use]
pub fn format_mm_ss(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes:02}:{remainder:02}")
}

/// Lifecycle of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Running,
    Expired,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// One second elapsed; the payload is the new remaining time.
    Remaining(u32),
    /// The countdown just ran out. Returned exactly once.
    Expired,
    /// Ticked after expiry; nothing to do.
    Idle,
}

/// Second-resolution countdown.
///
/// Starting at `n`, the first `n` ticks report `n-1 ..= 0`; tick `n+1`
/// reports `Tick::Expired`, and later ticks report `Tick::Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    state: CountdownState,
}

impl Countdown {
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
            state: CountdownState::Running,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[must_use]
    pub fn display(&self) -> TimerDisplay {
        match self.state {
            CountdownState::Running => TimerDisplay::Remaining(self.remaining),
            CountdownState::Expired => TimerDisplay::Expired,
        }
    }

    pub fn tick(&mut self) -> Tick {
        match self.state {
            CountdownState::Expired => Tick::Idle,
            CountdownState::Running => match self.remaining.checked_sub(1) {
                Some(next) => {
                    self.remaining = next;
                    Tick::Remaining(next)
                }
                None => {
                    self.state = CountdownState::Expired;
                    Tick::Expired
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_mm_ss(300), "05:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(6000), "100:00");
        assert_eq!(TimerDisplay::Expired.to_string(), EXPIRED_MARKER);
    }

    #[test]
    fn five_minutes_tick_three_hundred_times_then_expire_once() {
        let mut countdown = Countdown::new(300);
        let mut shown = Vec::new();
        let mut expired = 0;

        for _ in 0..305 {
            match countdown.tick() {
                Tick::Remaining(secs) => shown.push(format_mm_ss(secs)),
                Tick::Expired => expired += 1,
                Tick::Idle => {}
            }
        }

        assert_eq!(shown.len(), 300);
        assert_eq!(shown.first().map(String::as_str), Some("04:59"));
        assert_eq!(shown.last().map(String::as_str), Some("00:00"));
        assert_eq!(expired, 1);
        assert_eq!(countdown.display(), TimerDisplay::Expired);
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut countdown = Countdown::new(0);
        assert_eq!(countdown.display(), TimerDisplay::Remaining(0));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.state(), CountdownState::Expired);
    }
}
