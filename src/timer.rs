use crate::session::Status;
use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Countdown scheduler holding at most one outstanding tick.
///
/// The timer never re-arms itself: after a tick fires, the dispatcher calls
/// [`Timer::sync`] with the status the session ended up in, and only an
/// `Active` session gets the next tick scheduled.
#[derive(Debug, Clone)]
pub struct Timer {
    interval: Duration,
    deadline: Option<Instant>,
    last_fired: Option<Instant>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time until the outstanding tick is due, zero if overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consumes the outstanding tick if it is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.last_fired = Some(deadline);
                true
            }
            _ => false,
        }
    }

    /// Arms or disarms according to the session status.
    ///
    /// A tick following one that just fired is scheduled from the previous
    /// deadline so the countdown does not drift with processing time.
    pub fn sync(&mut self, status: Status, now: Instant) {
        if status != Status::Active {
            self.deadline = None;
            self.last_fired = None;
            return;
        }

        if self.deadline.is_none() {
            let base = self.last_fired.take().unwrap_or(now);
            self.deadline = Some(base + self.interval);
        }
    }
}
