// SPDX-License-Identifier: MPL-2.0
//! Fixed-period tick scheduler driven by observed instants.
//!
//! The ticker does not own a timer. The UI feeds it the instants delivered
//! by a periodic subscription and it answers how many whole periods have
//! elapsed since the last answer. Tests feed it synthetic instants.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped,
    /// Started, waiting for the first instant to anchor the schedule.
    Armed,
    Running { next_due: Instant },
}

/// Start/cancel handle for a repeating fixed-period tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    period: Duration,
    phase: Phase,
}

impl Ticker {
    /// Creates a stopped ticker. A zero period is raised to one millisecond.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            phase: Phase::Stopped,
        }
    }

    /// Starts the schedule at the next polled instant.
    pub fn start(&mut self) {
        self.phase = Phase::Armed;
    }

    /// Starts the schedule at `now`.
    pub fn start_at(&mut self, now: Instant) {
        self.phase = Phase::Running {
            next_due: now + self.period,
        };
    }

    /// Stops the schedule. Later polls report no ticks until restarted.
    pub fn cancel(&mut self) {
        self.phase = Phase::Stopped;
    }

    /// Number of ticks that fell due up to `now` since the previous poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        match self.phase {
            Phase::Stopped => 0,
            Phase::Armed => {
                self.start_at(now);
                0
            }
            Phase::Running { next_due } => {
                if now < next_due {
                    return 0;
                }
                let late = now.duration_since(next_due).as_nanos();
                let extra = late / self.period.as_nanos();
                let due = u32::try_from(extra.saturating_add(1)).unwrap_or(u32::MAX);
                self.phase = Phase::Running {
                    next_due: next_due + self.period * due,
                };
                due
            }
        }
    }
}
