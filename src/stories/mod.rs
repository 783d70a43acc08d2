// SPDX-License-Identifier: MPL-2.0
//! Story collection management.
//!
//! [`StoryCollection`] is the single owner of the in-memory story list and its
//! persisted copy. [`navigation`] holds the index rules used when the viewer
//! asks for the previous or next story.

mod collection;
pub mod navigation;

pub use collection::{LoadReport, StoryCollection};
pub use navigation::{NavigationContext, Selection, Step};
