// SPDX-License-Identifier: MPL-2.0
//! The story entity and its expiry rule.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Hours a story stays visible after creation.
pub const EXPIRY_WINDOW_HOURS: i64 = 24;

/// Returns the fixed interval after which a story is no longer shown or persisted.
#[must_use]
pub fn expiry_window() -> Duration {
    Duration::hours(EXPIRY_WINDOW_HOURS)
}

/// Unique token identifying a story within the collection.
///
/// New ids are the creation instant in epoch milliseconds, rendered as a
/// decimal string. Ids read back from storage are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds an id from an epoch-milliseconds value.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single ephemeral image post.
///
/// Stories are never mutated in place; collections replace them wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub id: StoryId,
    /// Image payload as a `data:` URI.
    pub image_url: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
}

impl Story {
    pub fn new(id: StoryId, image_url: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            image_url: image_url.into(),
            timestamp,
        }
    }

    /// Time elapsed since creation. Negative when the timestamp lies in the future.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    /// A story is visible only while `now - timestamp < 24h`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) >= expiry_window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn story_at(timestamp: DateTime<Utc>) -> Story {
        Story::new(StoryId::new("1"), "data:image/png;base64,", timestamp)
    }

    #[test]
    fn story_is_visible_just_before_the_window_closes() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let now = created + expiry_window() - Duration::milliseconds(1);
        assert!(!story_at(created).is_expired(now));
    }

    #[test]
    fn story_expires_exactly_at_the_window() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let now = created + expiry_window();
        assert!(story_at(created).is_expired(now));
    }

    #[test]
    fn story_from_the_future_is_not_expired() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let story = story_at(now + Duration::hours(3));
        assert!(story.age(now) < Duration::zero());
        assert!(!story.is_expired(now));
    }

    #[test]
    fn id_from_millis_is_decimal_string() {
        assert_eq!(StoryId::from_millis(1_714_564_800_123).as_str(), "1714564800123");
        assert_eq!(StoryId::from_millis(42).to_string(), "42");
    }
}
