// SPDX-License-Identifier: MPL-2.0
//! Persistence ports and adapters for the story collection.
//!
//! Two layers are involved:
//!
//! - [`KeyValueStore`] is the local-storage equivalent: string values under
//!   string keys, read and written wholesale. [`FileStore`] keeps one JSON
//!   document per key in the data directory, [`MemoryStore`] keeps them in
//!   memory for tests.
//! - [`StoryStorage`] is the collection-level contract used by the collection
//!   manager. [`StoryStore`] implements it on top of any key-value store using
//!   the [`STORIES_KEY`] key.

mod file;
mod memory;
mod stories;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use stories::{StoryStore, STORIES_KEY};

use crate::domain::Story;
use crate::error::Result;

/// String values under string keys, read and written wholesale.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// The persisted collection as read back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredStories {
    /// Well-formed records in stored order.
    pub stories: Vec<Story>,
    /// Records skipped because they do not have the story shape.
    pub malformed: usize,
}

/// Whole-collection persistence for stories.
pub trait StoryStorage {
    /// Reads the persisted collection in stored order.
    ///
    /// Records that are not stories are skipped and counted. Returns
    /// [`Error::StorageCorrupt`](crate::error::Error::StorageCorrupt) when
    /// the document itself is not a JSON array.
    fn read(&self) -> Result<StoredStories>;

    /// Overwrites the persisted collection.
    fn write(&self, stories: &[Story]) -> Result<()>;
}
