// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::domain::StoryId;
use crate::error::{Error, UploadError};
use crate::media::DecodedStory;
use crate::ui::notifications;
use crate::ui::story_list;
use crate::ui::story_viewer;
use iced::Size;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    StoryList(story_list::Message),
    Viewer(story_viewer::Message),
    Notification(notifications::NotificationMessage),
    /// Periodic expiry check of the stored collection.
    RecheckExpiry,
    Tick(Instant), // Notification auto-dismiss
    /// Result from the file picker; `None` when cancelled.
    FileChosen(Option<PathBuf>),
    /// The window was resized.
    WindowResized(Size),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// An accepted upload finished encoding to a `data:` URI.
    UploadEncoded(Result<String, UploadError>),
    /// The blocking rejection dialog was closed.
    UploadRejectionAcknowledged,
    ImageDecoded {
        id: StoryId,
        result: Result<DecodedStory, Error>,
    },
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `es`, `en-US`).
    pub lang: Option<String>,
    /// Optional data directory override (for the story document).
    /// Takes precedence over `ICED_STORIES_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_STORIES_CONFIG_DIR`.
    pub config_dir: Option<String>,
}
