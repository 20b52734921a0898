//! On-screen hint shown when walking starts; dismisses itself after a fixed time.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct HintToast {
    message: String,
    duration: Duration,
    shown_at: Option<Instant>,
}

impl HintToast {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
            shown_at: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Show the hint from `now`. Showing it again restarts the timer.
    pub fn show(&mut self, now: Instant) {
        self.shown_at = Some(now);
    }

    pub fn hide(&mut self) {
        self.shown_at = None;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.remaining(now).is_some()
    }

    /// Time left before the hint dismisses itself, if it is showing.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let shown_at = self.shown_at?;
        let elapsed = now.saturating_duration_since(shown_at);
        self.duration.checked_sub(elapsed).filter(|left| !left.is_zero())
    }
}
