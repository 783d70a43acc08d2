// SPDX-License-Identifier: MPL-2.0
//! Auto-advance progress counter.
//!
//! Progress is counted in whole ticks so completion is exact: a story shown
//! for `n` seconds completes on tick `n * TICKS_PER_SECOND`.

use crate::ui::state::StoryDuration;
use std::time::Duration;

/// Period of the progress timer.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Progress ticks per second of display time.
pub const TICKS_PER_SECOND: u32 = 20;

/// Progress through the current story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    elapsed: u32,
    total: u32,
}

impl Progress {
    #[must_use]
    pub fn new(duration: StoryDuration) -> Self {
        Self {
            elapsed: 0,
            total: duration.value().saturating_mul(TICKS_PER_SECOND).max(1),
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    /// Adds `ticks` and reports whether the story is now complete.
    pub fn advance(&mut self, ticks: u32) -> bool {
        self.elapsed = self.elapsed.saturating_add(ticks).min(self.total);
        self.is_complete()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total
    }

    /// Progress on the 0–100 scale.
    #[must_use]
    pub fn percent(&self) -> f32 {
        self.fraction() * 100.0
    }

    /// Progress on the 0–1 scale.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.elapsed as f32 / self.total as f32
    }

    #[must_use]
    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed
    }

    #[must_use]
    pub fn total_ticks(&self) -> u32 {
        self.total
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(StoryDuration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_seconds_is_one_hundred_ticks() {
        let progress = Progress::new(StoryDuration::new(5));
        assert_eq!(progress.total_ticks(), 100);
    }

    #[test]
    fn each_tick_adds_one_percent_for_five_seconds() {
        let mut progress = Progress::new(StoryDuration::new(5));
        progress.advance(1);
        assert!((progress.percent() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn completes_exactly_on_last_tick() {
        let mut progress = Progress::new(StoryDuration::new(1));
        assert!(!progress.advance(19));
        assert!(progress.advance(1));
        assert!((progress.percent() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn overshoot_is_clamped() {
        let mut progress = Progress::new(StoryDuration::new(1));
        assert!(progress.advance(500));
        assert_eq!(progress.elapsed_ticks(), 20);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut progress = Progress::new(StoryDuration::new(1));
        progress.advance(10);
        progress.reset();
        assert_eq!(progress.elapsed_ticks(), 0);
    }
}
