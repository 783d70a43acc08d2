// SPDX-License-Identifier: MPL-2.0
//! The story collection manager.
//!
//! Every mutation follows the same shape: change the in-memory list, overwrite
//! the persisted collection wholesale, and undo the in-memory change if the
//! write fails. After any successful call the two copies are equal.

use crate::domain::{Clock, Story, StoryId};
use crate::error::{Error, Result};
use crate::storage::StoryStorage;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Summary of one load cycle.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Stories dropped because they reached the expiry window.
    pub pruned: usize,
    /// Records dropped because an earlier record had the same id.
    pub duplicates: usize,
    /// Stored records dropped because they were not stories.
    pub malformed: usize,
    /// The stored document could not be parsed and was replaced by an empty one.
    pub reset_corrupt: bool,
    /// The write-back after pruning or resetting failed.
    ///
    /// The filtered collection is published regardless.
    pub write_error: Option<Error>,
}

impl LoadReport {
    /// Whether the load cycle changed what was stored.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.pruned > 0 || self.duplicates > 0 || self.malformed > 0 || self.reset_corrupt
    }
}

/// Sole owner of the story collection and its persisted copy.
pub struct StoryCollection {
    stories: Vec<Story>,
    storage: Box<dyn StoryStorage>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for StoryCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryCollection")
            .field("stories", &self.stories.len())
            .finish_non_exhaustive()
    }
}

impl StoryCollection {
    /// Creates an empty collection. Call [`load`](Self::load) to read the
    /// persisted stories.
    pub fn new(storage: impl StoryStorage + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            stories: Vec::new(),
            storage: Box::new(storage),
            clock: Box::new(clock),
        }
    }

    /// Stories in display order, oldest first.
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    /// Index of the story with `id`, if present.
    #[must_use]
    pub fn position(&self, id: &StoryId) -> Option<usize> {
        self.stories.iter().position(|story| &story.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &StoryId) -> bool {
        self.position(id).is_some()
    }

    /// Current instant according to the collection's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Reads the persisted collection, drops expired and duplicate records,
    /// writes the filtered result back if it differs and publishes it.
    ///
    /// A corrupt document resets the collection to empty. Any other read
    /// failure is returned and the in-memory collection is left untouched.
    pub fn load(&mut self) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        let stored = match self.storage.read() {
            Ok(stored) => {
                report.malformed = stored.malformed;
                stored.stories
            }
            Err(Error::StorageCorrupt(reason)) => {
                tracing::warn!(%reason, "stored stories are corrupt, resetting to empty");
                report.reset_corrupt = true;
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored stories");
                return Err(e);
            }
        };

        let now = self.clock.now();
        let mut seen = HashSet::with_capacity(stored.len());
        let mut kept = Vec::with_capacity(stored.len());

        for story in stored {
            if !seen.insert(story.id.clone()) {
                report.duplicates += 1;
                continue;
            }
            if story.is_expired(now) {
                tracing::debug!(id = %story.id, "pruning expired story");
                report.pruned += 1;
                continue;
            }
            kept.push(story);
        }

        if report.changed() {
            if let Err(e) = self.storage.write(&kept) {
                tracing::warn!(error = %e, "failed to write back pruned stories");
                report.write_error = Some(e);
            }
        }

        if report.pruned > 0 || report.duplicates > 0 || report.malformed > 0 {
            tracing::info!(
                pruned = report.pruned,
                duplicates = report.duplicates,
                malformed = report.malformed,
                remaining = kept.len(),
                "story collection pruned"
            );
        }

        self.stories = kept;
        Ok(report)
    }

    /// Appends a new story created now and persists the collection.
    ///
    /// On write failure the story is removed again and the error returned.
    pub fn add(&mut self, image_url: impl Into<String>) -> Result<Story> {
        let now = self.clock.now();
        let story = Story::new(self.unique_id(now), image_url, now);

        self.stories.push(story.clone());
        if let Err(e) = self.storage.write(&self.stories) {
            self.stories.pop();
            tracing::error!(error = %e, "failed to persist new story");
            return Err(e);
        }

        tracing::info!(id = %story.id, total = self.stories.len(), "story added");
        Ok(story)
    }

    /// Removes the story with `id` and persists the collection.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is absent.
    pub fn delete(&mut self, id: &StoryId) -> Result<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "delete ignored, story not present");
            return Ok(false);
        };

        let removed = self.stories.remove(index);
        if let Err(e) = self.storage.write(&self.stories) {
            self.stories.insert(index, removed);
            tracing::error!(%id, error = %e, "failed to persist story deletion");
            return Err(e);
        }

        tracing::info!(%id, total = self.stories.len(), "story deleted");
        Ok(true)
    }

    /// Epoch milliseconds of `now`, bumped until no existing story uses it.
    fn unique_id(&self, now: DateTime<Utc>) -> StoryId {
        let mut millis = now.timestamp_millis();
        loop {
            let id = StoryId::from_millis(millis);
            if !self.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ManualClock;
    use crate::storage::{KeyValueStore, MemoryStore, StoryStore, STORIES_KEY};
    use chrono::{Duration, TimeZone};

    const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn collection() -> (StoryCollection, MemoryStore, ManualClock) {
        let backend = MemoryStore::new();
        let clock = ManualClock::new(start());
        let collection = StoryCollection::new(StoryStore::new(backend.clone()), clock.clone());
        (collection, backend, clock)
    }

    fn persisted(backend: &MemoryStore) -> Vec<Story> {
        StoryStore::new(backend.clone()).read().expect("read").stories
    }

    #[test]
    fn load_of_missing_key_is_empty_and_does_not_write() {
        let (mut collection, backend, _) = collection();

        let report = collection.load().expect("load");

        assert!(collection.is_empty());
        assert!(!report.changed());
        assert!(backend.get_item(STORIES_KEY).expect("get").is_none());
    }

    #[test]
    fn load_prunes_expired_stories_from_memory_and_storage() {
        let backend = MemoryStore::new();
        let store = StoryStore::new(backend.clone());
        store
            .write(&[
                Story::new(StoryId::new("old"), PNG, start() - Duration::hours(24)),
                Story::new(StoryId::new("fresh"), PNG, start() - Duration::hours(23)),
            ])
            .expect("seed");
        let mut collection = StoryCollection::new(store, ManualClock::new(start()));

        let report = collection.load().expect("load");

        assert_eq!(report.pruned, 1);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.stories()[0].id.as_str(), "fresh");
        assert_eq!(persisted(&backend), collection.stories());
    }

    #[test]
    fn load_drops_duplicate_ids_keeping_the_first() {
        let backend = MemoryStore::new();
        let store = StoryStore::new(backend.clone());
        store
            .write(&[
                Story::new(StoryId::new("a"), "data:image/png;base64,AA==", start()),
                Story::new(StoryId::new("a"), "data:image/png;base64,BB==", start()),
            ])
            .expect("seed");
        let mut collection = StoryCollection::new(store, ManualClock::new(start()));

        let report = collection.load().expect("load");

        assert_eq!(report.duplicates, 1);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.stories()[0].image_url, "data:image/png;base64,AA==");
        assert_eq!(persisted(&backend).len(), 1);
    }

    #[test]
    fn corrupt_storage_resets_to_empty_and_persists() {
        let backend = MemoryStore::with_item(STORIES_KEY, "not json");
        let mut collection =
            StoryCollection::new(StoryStore::new(backend.clone()), ManualClock::new(start()));

        let report = collection.load().expect("load");

        assert!(report.reset_corrupt);
        assert!(collection.is_empty());
        assert_eq!(backend.get_item(STORIES_KEY).expect("get").as_deref(), Some("[]"));
    }

    #[test]
    fn malformed_record_is_dropped_without_losing_valid_stories() {
        let raw = format!(
            r#"[{{"id":"keep","imageUrl":"{PNG}","timestamp":"{}"}},{{"id":2,"imageUrl":"{PNG}","timestamp":"{}"}}]"#,
            start().to_rfc3339(),
            start().to_rfc3339(),
        );
        let backend = MemoryStore::with_item(STORIES_KEY, raw);
        let mut collection =
            StoryCollection::new(StoryStore::new(backend.clone()), ManualClock::new(start()));

        let report = collection.load().expect("load");

        assert!(!report.reset_corrupt);
        assert_eq!(report.malformed, 1);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.stories()[0].id.as_str(), "keep");
        assert_eq!(persisted(&backend), collection.stories());
        assert!(!backend.get_item(STORIES_KEY).expect("get").unwrap_or_default().contains("\"id\":2"));
    }

    #[test]
    fn prune_publishes_filtered_collection_even_if_write_back_fails() {
        let backend = MemoryStore::new();
        let store = StoryStore::new(backend.clone());
        store
            .write(&[Story::new(StoryId::new("old"), PNG, start() - Duration::days(2))])
            .expect("seed");
        backend.set_read_only(true);
        let mut collection = StoryCollection::new(store, ManualClock::new(start()));

        let report = collection.load().expect("load");

        assert!(report.write_error.is_some());
        assert!(collection.is_empty());
    }

    #[test]
    fn periodic_reload_prunes_once_window_passes() {
        let (mut collection, backend, clock) = collection();
        collection.add(PNG).expect("add");

        clock.advance(Duration::hours(24) - Duration::milliseconds(1));
        collection.load().expect("load");
        assert_eq!(collection.len(), 1);

        clock.advance(Duration::milliseconds(1));
        collection.load().expect("load");
        assert!(collection.is_empty());
        assert!(persisted(&backend).is_empty());
    }

    #[test]
    fn add_appends_and_persists() {
        let (mut collection, backend, _) = collection();

        let story = collection.add(PNG).expect("add");

        assert_eq!(story.id.as_str(), start().timestamp_millis().to_string());
        assert_eq!(story.timestamp, start());
        assert_eq!(collection.stories(), &[story]);
        assert_eq!(persisted(&backend), collection.stories());
    }

    #[test]
    fn add_within_the_same_millisecond_gets_a_unique_id() {
        let (mut collection, _, _) = collection();

        let first = collection.add(PNG).expect("add");
        let second = collection.add(PNG).expect("add");

        assert_ne!(first.id, second.id);
        assert_eq!(
            second.id,
            StoryId::from_millis(start().timestamp_millis() + 1)
        );
    }

    #[test]
    fn add_rolls_back_when_write_fails() {
        let (mut collection, backend, _) = collection();
        collection.add(PNG).expect("add");
        backend.set_read_only(true);

        assert!(collection.add(PNG).is_err());
        assert_eq!(collection.len(), 1);
        assert_eq!(persisted(&backend), collection.stories());
    }

    #[test]
    fn delete_removes_and_persists() {
        let (mut collection, backend, clock) = collection();
        let first = collection.add(PNG).expect("add");
        clock.advance(Duration::seconds(1));
        let second = collection.add(PNG).expect("add");

        assert!(collection.delete(&first.id).expect("delete"));

        assert_eq!(collection.stories(), &[second]);
        assert_eq!(persisted(&backend), collection.stories());
    }

    #[test]
    fn deleting_twice_matches_deleting_once() {
        let (mut collection, backend, _) = collection();
        let story = collection.add(PNG).expect("add");

        assert!(collection.delete(&story.id).expect("delete"));
        assert!(!collection.delete(&story.id).expect("delete"));

        assert!(collection.is_empty());
        assert!(persisted(&backend).is_empty());
    }

    #[test]
    fn delete_rolls_back_at_the_same_position_when_write_fails() {
        let (mut collection, backend, clock) = collection();
        let first = collection.add(PNG).expect("add");
        clock.advance(Duration::seconds(1));
        collection.add(PNG).expect("add");
        backend.set_read_only(true);

        assert!(collection.delete(&first.id).is_err());

        assert_eq!(collection.position(&first.id), Some(0));
        assert_eq!(collection.len(), 2);
    }
}
