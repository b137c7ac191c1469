use std::time::{Duration, Instant};

/// Handle to the one pending tick of a session.
///
/// Arming always replaces whatever was pending, so at most one tick is ever
/// scheduled.
#[derive(Debug, Default)]
pub struct TickTimer {
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    pub fn arm(&mut self, now: Instant, interval: Duration) {
        self.cancel();
        self.deadline = Some(now + interval);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left before the pending tick, zero when overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
