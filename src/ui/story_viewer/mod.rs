// SPDX-License-Identifier: MPL-2.0
//! Full-screen, auto-advancing story viewer.
//!
//! - [`component`] - session state machine (playing, paused, confirming delete)
//! - [`progress`] - tick-based progress counter
//! - [`view`] - 9:16 frame rendering

pub mod component;
pub mod progress;
pub mod view;

pub use component::{Effect, Message, Phase, State};
pub use progress::{Progress, TICK_INTERVAL, TICKS_PER_SECOND};
