// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! Interaction state kept out of the view code: the viewer's tick schedule,
//! touch swipe tracking and the configured story duration.

pub mod story_duration;
pub mod swipe;
pub mod ticker;

// Re-export commonly used types for convenience
pub use story_duration::StoryDuration;
pub use swipe::{SwipeDirection, SwipeState, SWIPE_THRESHOLD};
pub use ticker::Ticker;
