// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! renders from a borrowed view model and reports user intent through its
//! own message type.
//!
//! # Screens
//!
//! - [`story_list`] - Thumbnail strip with the add button
//! - [`story_viewer`] - Full-screen auto-advancing viewer
//!
//! # Shared Infrastructure
//!
//! - [`state`] - Tick scheduling, swipe tracking, story duration
//! - [`notifications`] - Toast notification system for user feedback
//! - [`styles`] - Centralized styling (buttons, containers)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode management

pub mod design_tokens;
pub mod notifications;
pub mod state;
pub mod story_list;
pub mod story_viewer;
pub mod styles;
pub mod theming;
