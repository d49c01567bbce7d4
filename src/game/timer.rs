//! Cancellable scheduled tasks driven by the session clock.
//!
//! The session owns one `RepeatingTask` per background chain (spawning, speed
//! ramp). Tasks never run themselves: the session polls them at the start of
//! each tick and decides whether to reschedule.

/// A handle to a task that is due at some session time, or idle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepeatingTask {
    next_due_ms: Option<f64>,
}

impl RepeatingTask {
    /// A task with nothing scheduled.
    pub fn idle() -> Self {
        Self { next_due_ms: None }
    }

    /// A task due `delay_ms` after `now_ms`.
    pub fn after(now_ms: f64, delay_ms: f64) -> Self {
        Self {
            next_due_ms: Some(now_ms + delay_ms),
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        self.next_due_ms
    }

    pub fn schedule_at(&mut self, at_ms: f64) {
        self.next_due_ms = Some(at_ms);
    }

    /// Stop the task. Later polls never fire.
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    /// One-shot poll: returns true and disarms the task if it is due.
    /// The caller reschedules if the chain should continue.
    pub fn fire_once(&mut self, now_ms: f64) -> bool {
        match self.next_due_ms {
            Some(due) if due <= now_ms => {
                self.next_due_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Fixed-cadence poll: returns how many periods elapsed and keeps the
    /// task armed on its original cadence.
    pub fn fire_every(&mut self, now_ms: f64, period_ms: f64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            return 0;
        };
        if period_ms <= 0.0 {
            return 0;
        }

        let mut fired = 0;
        while due <= now_ms {
            fired += 1;
            due += period_ms;
        }
        self.next_due_ms = Some(due);
        fired
    }
}
