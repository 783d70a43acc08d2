// SPDX-License-Identifier: MPL-2.0
//! Story display duration for the auto-advancing viewer.

use crate::config::{
    DEFAULT_STORY_DURATION_SECS, MAX_STORY_DURATION_SECS, MIN_STORY_DURATION_SECS,
};

/// Seconds each story stays on screen before the viewer advances.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–60 seconds).
///
/// # Example
///
/// ```
/// use iced_stories::ui::state::StoryDuration;
///
/// assert_eq!(StoryDuration::new(5).value(), 5);
/// assert_eq!(StoryDuration::new(0).value(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryDuration(u32);

impl StoryDuration {
    /// Creates a new duration, clamping to the valid range.
    #[must_use]
    pub fn new(secs: u32) -> Self {
        Self(secs.clamp(MIN_STORY_DURATION_SECS, MAX_STORY_DURATION_SECS))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for StoryDuration {
    fn default() -> Self {
        Self(DEFAULT_STORY_DURATION_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_to_valid_range() {
        assert_eq!(StoryDuration::new(0).value(), MIN_STORY_DURATION_SECS);
        assert_eq!(StoryDuration::new(600).value(), MAX_STORY_DURATION_SECS);
    }

    #[test]
    fn default_is_five_seconds() {
        assert_eq!(StoryDuration::default().value(), 5);
    }
}
