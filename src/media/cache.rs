// SPDX-License-Identifier: MPL-2.0
//! Decoded image cache keyed by story id.
//!
//! Thumbnails are small and always visible, so every story in the collection
//! keeps one. Full-size images are only needed around the viewer position and
//! live in a bounded LRU.

use super::image::{DecodedStory, ImageData};
use crate::domain::StoryId;
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

/// Default number of full-size images kept.
pub const DEFAULT_FULL_IMAGES: usize = 8;

/// Per-story decoded images.
pub struct ImageCache {
    thumbnails: HashMap<StoryId, ImageData>,
    full: LruCache<StoryId, ImageData>,
    pending: HashSet<StoryId>,
    failed: HashSet<StoryId>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_FULL_IMAGES)
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("thumbnails", &self.thumbnails.len())
            .field("full", &self.full.len())
            .field("pending", &self.pending.len())
            .field("failed", &self.failed.len())
            .finish()
    }
}

impl ImageCache {
    /// Creates a cache holding at most `full_capacity` full-size images
    /// (at least one).
    #[must_use]
    pub fn new(full_capacity: usize) -> Self {
        Self {
            thumbnails: HashMap::new(),
            full: LruCache::new(NonZeroUsize::new(full_capacity).unwrap_or(NonZeroUsize::MIN)),
            pending: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    /// Marks `id` as being decoded.
    ///
    /// Returns `false` if the story is already cached, pending or known to
    /// be undecodable, in which case no decode should be started.
    pub fn begin_decode(&mut self, id: &StoryId, need_full: bool) -> bool {
        if self.pending.contains(id) || self.failed.contains(id) {
            return false;
        }
        let has_thumbnail = self.thumbnails.contains_key(id);
        let has_full = self.full.contains(id);
        if has_thumbnail && (has_full || !need_full) {
            return false;
        }
        self.pending.insert(id.clone());
        true
    }

    /// Stores the result of a decode started with [`begin_decode`](Self::begin_decode).
    pub fn finish_decode(&mut self, id: StoryId, decoded: Option<DecodedStory>) {
        self.pending.remove(&id);
        match decoded {
            Some(decoded) => {
                self.thumbnails.insert(id.clone(), decoded.thumbnail);
                self.full.put(id, decoded.full);
            }
            None => {
                self.failed.insert(id);
            }
        }
    }

    #[must_use]
    pub fn thumbnail(&self, id: &StoryId) -> Option<&ImageData> {
        self.thumbnails.get(id)
    }

    /// Full-size image for `id` without touching the LRU order.
    #[must_use]
    pub fn peek_full(&self, id: &StoryId) -> Option<&ImageData> {
        self.full.peek(id)
    }

    #[must_use]
    pub fn has_failed(&self, id: &StoryId) -> bool {
        self.failed.contains(id)
    }

    /// Drops everything cached for stories not in `live`.
    pub fn retain(&mut self, live: &HashSet<StoryId>) {
        self.thumbnails.retain(|id, _| live.contains(id));
        self.pending.retain(|id| live.contains(id));
        self.failed.retain(|id| live.contains(id));

        let stale: Vec<StoryId> = self
            .full
            .iter()
            .filter(|(id, _)| !live.contains(*id))
            .map(|(id, _)| id.clone())
            .collect();
        for id in stale {
            self.full.pop(&id);
        }
    }
}
