// SPDX-License-Identifier: MPL-2.0
//! Domain layer - core story types and business rules.
//!
//! This module contains the story entity, its identifier and expiry rule, and
//! the clock port used to evaluate expiry. Nothing here touches the UI or the
//! filesystem, so the rules are testable on their own.
//!
//! # Modules
//!
//! - [`story`]: [`Story`](story::Story), [`StoryId`](story::StoryId) and the
//!   24 hour expiry window
//! - [`clock`]: [`Clock`](clock::Clock) port with system and manual clocks

pub mod clock;
pub mod story;

pub use clock::{Clock, ManualClock, SystemClock};
pub use story::{expiry_window, Story, StoryId, EXPIRY_WINDOW_HOURS};
