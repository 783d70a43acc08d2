// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration constants.
//!
//! # Categories
//!
//! - **Viewer**: How long each story stays on screen
//! - **Expiry**: How often the collection is re-checked for expired stories

// ==========================================================================
// Viewer Defaults
// ==========================================================================

/// Default time a story stays on screen before auto-advancing (in seconds).
pub const DEFAULT_STORY_DURATION_SECS: u32 = 5;

/// Minimum story duration (in seconds).
pub const MIN_STORY_DURATION_SECS: u32 = 1;

/// Maximum story duration (in seconds).
pub const MAX_STORY_DURATION_SECS: u32 = 60;

// ==========================================================================
// Expiry Defaults
// ==========================================================================

/// Interval between two background expiry checks (in seconds).
pub const RECHECK_INTERVAL_SECS: u64 = 60;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_STORY_DURATION_SECS > 0);
    assert!(MIN_STORY_DURATION_SECS <= DEFAULT_STORY_DURATION_SECS);
    assert!(DEFAULT_STORY_DURATION_SECS <= MAX_STORY_DURATION_SECS);
    assert!(RECHECK_INTERVAL_SECS > 0);
};
