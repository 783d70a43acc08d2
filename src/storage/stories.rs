// SPDX-License-Identifier: MPL-2.0
//! JSON persistence of the story collection under a single key.
//!
//! The stored document is an ordered JSON array of
//! `{ "id", "imageUrl", "timestamp" }` records, where `timestamp` is an
//! RFC 3339 instant with millisecond precision in UTC.

use super::{KeyValueStore, StoredStories, StoryStorage};
use crate::domain::{Story, StoryId};
use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Storage key holding the story collection.
pub const STORIES_KEY: &str = "stories";

/// On-disk shape of a story record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStory {
    id: String,
    image_url: String,
    timestamp: String,
}

impl From<&Story> for StoredStory {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.as_str().to_string(),
            image_url: story.image_url.clone(),
            timestamp: story.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl From<StoredStory> for Story {
    /// An unparseable timestamp is mapped to the Unix epoch so the record
    /// reads as long expired and is dropped by the next prune.
    fn from(stored: StoredStory) -> Self {
        let timestamp = match DateTime::parse_from_rfc3339(&stored.timestamp) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!(
                    id = %stored.id,
                    timestamp = %stored.timestamp,
                    error = %e,
                    "story has an invalid timestamp, treating it as expired"
                );
                DateTime::<Utc>::UNIX_EPOCH
            }
        };
        Story::new(StoryId::new(stored.id), stored.image_url, timestamp)
    }
}

/// [`StoryStorage`] backed by a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct StoryStore<K> {
    backend: K,
}

impl<K: KeyValueStore> StoryStore<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }
}

impl<K: KeyValueStore> StoryStorage for StoryStore<K> {
    fn read(&self) -> Result<StoredStories> {
        let Some(content) = self.backend.get_item(STORIES_KEY)? else {
            return Ok(StoredStories::default());
        };

        // An empty value is treated as a key that was never written
        if content.trim().is_empty() {
            return Ok(StoredStories::default());
        }

        let records: Vec<serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| Error::StorageCorrupt(format!("{STORIES_KEY}: {e}")))?;

        let mut stored = StoredStories::default();
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<StoredStory>(record) {
                Ok(record) => stored.stories.push(Story::from(record)),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed story record");
                    stored.malformed += 1;
                }
            }
        }
        Ok(stored)
    }

    fn write(&self, stories: &[Story]) -> Result<()> {
        let records: Vec<StoredStory> = stories.iter().map(StoredStory::from).collect();
        let content = serde_json::to_string(&records)
            .map_err(|e| Error::Io(format!("Failed to serialize {STORIES_KEY}: {e}")))?;
        self.backend.set_item(STORIES_KEY, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn sample_story(id: &str) -> Story {
        Story::new(
            StoryId::new(id),
            "data:image/png;base64,iVBORw0KGgo=",
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
        )
    }

    #[test]
    fn missing_key_reads_as_empty_collection() {
        let store = StoryStore::new(MemoryStore::new());
        assert_eq!(store.read().expect("read"), StoredStories::default());
    }

    #[test]
    fn empty_value_reads_as_empty_collection() {
        let store = StoryStore::new(MemoryStore::with_item(STORIES_KEY, "  "));
        assert_eq!(store.read().expect("read"), StoredStories::default());
    }

    #[test]
    fn write_then_read_preserves_order_and_fields() {
        let store = StoryStore::new(MemoryStore::new());
        let stories = vec![sample_story("1"), sample_story("2")];

        store.write(&stories).expect("write");

        assert_eq!(store.read().expect("read").stories, stories);
    }

    #[test]
    fn written_document_uses_camel_case_and_iso_timestamps() {
        let backend = MemoryStore::new();
        let store = StoryStore::new(backend.clone());

        store.write(&[sample_story("1714552200000")]).expect("write");

        let raw = backend.get_item(STORIES_KEY).expect("get").expect("present");
        assert_eq!(
            raw,
            r#"[{"id":"1714552200000","imageUrl":"data:image/png;base64,iVBORw0KGgo=","timestamp":"2024-05-01T08:30:00.000Z"}]"#
        );
    }

    #[test]
    fn accepts_offset_timestamps() {
        let raw = r#"[{"id":"a","imageUrl":"data:image/png;base64,","timestamp":"2024-05-01T10:30:00+02:00"}]"#;
        let store = StoryStore::new(MemoryStore::with_item(STORIES_KEY, raw));

        let stories = store.read().expect("read").stories;

        assert_eq!(
            stories[0].timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn invalid_timestamp_reads_as_epoch() {
        let raw = r#"[{"id":"a","imageUrl":"data:image/png;base64,","timestamp":"yesterday"}]"#;
        let store = StoryStore::new(MemoryStore::with_item(STORIES_KEY, raw));

        let stories = store.read().expect("read").stories;

        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].timestamp, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn malformed_document_is_reported_as_corrupt() {
        let store = StoryStore::new(MemoryStore::with_item(STORIES_KEY, "{\"oops\":"));
        assert!(matches!(store.read(), Err(Error::StorageCorrupt(_))));
    }

    #[test]
    fn malformed_records_are_skipped_individually() {
        let raw = r#"[
            {"id":"1","imageUrl":"data:image/png;base64,","timestamp":"2024-05-01T08:30:00.000Z"},
            {"id":2,"imageUrl":"data:image/png;base64,","timestamp":"2024-05-01T08:30:00.000Z"},
            {"id":"3","timestamp":"2024-05-01T08:30:00.000Z"},
            "not a story"
        ]"#;
        let store = StoryStore::new(MemoryStore::with_item(STORIES_KEY, raw));

        let stored = store.read().expect("read");

        assert_eq!(stored.malformed, 3);
        assert_eq!(stored.stories.len(), 1);
        assert_eq!(stored.stories[0].id, StoryId::new("1"));
    }

    #[test]
    fn wrong_shape_is_reported_as_corrupt() {
        let store = StoryStore::new(MemoryStore::with_item(STORIES_KEY, r#"{"id":"1"}"#));
        assert!(matches!(store.read(), Err(Error::StorageCorrupt(_))));
    }

    #[test]
    fn write_failure_is_propagated() {
        let backend = MemoryStore::new();
        backend.set_read_only(true);
        let store = StoryStore::new(backend);

        assert!(matches!(store.write(&[sample_story("1")]), Err(Error::Io(_))));
    }
}
