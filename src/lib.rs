// SPDX-License-Identifier: MPL-2.0
//! `iced_stories` keeps a strip of image stories that expire 24 hours after
//! they are added, with a full-screen auto-advancing viewer.
//!
//! The crate is split into a storage-agnostic core ([`domain`], [`stories`],
//! [`storage`]) and the Iced front end ([`app`], [`ui`]), with [`media`]
//! handling uploads and image decoding in between.

pub mod app;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod media;
pub mod storage;
pub mod stories;
pub mod ui;

pub use app::config;
