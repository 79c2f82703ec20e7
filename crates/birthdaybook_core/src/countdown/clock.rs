//! Sources of "now" for roster recomputation.
//!
//! The roster reads its clock on every mutation and snapshot. Countdown
//! functions themselves stay clock-free.

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Supplies the reference instant on the single local calendar.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the process-local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Caller-controlled clock for tests and replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Moves the clock to an absolute instant.
    pub fn set(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    /// Moves the clock forward by `days` whole days.
    pub fn advance_days(&mut self, days: i64) {
        self.now += TimeDelta::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
