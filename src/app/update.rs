// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Handlers receive an [`UpdateContext`] borrowing the parts of the `App`
//! they may touch and return the follow-up [`Task`].

use super::Message;
use crate::domain::StoryId;
use crate::error::{Error, UploadError};
use crate::i18n::fluent::I18n;
use crate::media::{self, upload, DecodedStory, ImageCache, UploadFile, IMAGE_EXTENSIONS};
use crate::stories::{Selection, Step, StoryCollection};
use crate::ui::notifications::{self, Notification};
use crate::ui::story_list;
use crate::ui::story_viewer::{self, Effect};
use iced::Task;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// Mutable view of the application state handed to the handlers.
pub struct UpdateContext<'a> {
    pub i18n: &'a I18n,
    pub stories: &'a mut StoryCollection,
    pub viewer: &'a mut story_viewer::State,
    pub selection: &'a mut Option<Selection>,
    pub images: &'a mut ImageCache,
    pub uploading: &'a mut bool,
    pub rejection: &'a mut Option<UploadError>,
    pub notifications: &'a mut notifications::Manager,
}

// =============================================================================
// Load cycle
// =============================================================================

/// Runs a load/prune cycle and brings the viewer and image cache in line
/// with the published collection.
pub fn handle_reload(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    match ctx.stories.load() {
        Ok(report) => {
            if report.reset_corrupt {
                ctx.notifications
                    .push(Notification::warning("notification-storage-corrupt"));
            }
            if report.write_error.is_some() {
                ctx.notifications
                    .push(Notification::warning("notification-storage-prune-error"));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "keeping previous stories after failed read");
            ctx.notifications
                .push(Notification::warning("notification-storage-read-error"));
        }
    }

    follow_displayed_story(ctx);
    collection_changed(ctx)
}

/// Re-resolves the displayed story after the collection changed underneath
/// the viewer. Closes the viewer if the story is gone.
fn follow_displayed_story(ctx: &mut UpdateContext<'_>) {
    let Some(id) = ctx.viewer.story().cloned() else {
        return;
    };

    let len = ctx.stories.len();
    match ctx
        .stories
        .position(&id)
        .and_then(|index| Selection::new(index, len))
    {
        Some(selection) => {
            *ctx.selection = Some(selection);
            ctx.viewer
                .show(id, selection.context(len), Instant::now());
        }
        None => {
            tracing::info!(%id, "displayed story left the collection, closing viewer");
            close_viewer(ctx);
        }
    }
}

/// Evicts images of removed stories and starts decodes for new ones.
fn collection_changed(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let live: HashSet<StoryId> = ctx.stories.stories().iter().map(|s| s.id.clone()).collect();
    ctx.images.retain(&live);
    request_decodes(ctx)
}

/// Starts background decodes for every story missing a thumbnail, plus the
/// full image of the displayed story and its neighbours.
pub fn request_decodes(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let around = ctx.selection.map(Selection::index);
    let mut tasks = Vec::new();

    for (index, story) in ctx.stories.stories().iter().enumerate() {
        let need_full = around.is_some_and(|current| index.abs_diff(current) <= 1);
        if !ctx.images.begin_decode(&story.id, need_full) {
            continue;
        }

        let id = story.id.clone();
        let image_url = story.image_url.clone();
        tasks.push(Task::perform(
            async move { media::decode_story_image(&image_url) },
            move |result| Message::ImageDecoded { id, result },
        ));
    }

    Task::batch(tasks)
}

pub fn handle_image_decoded(
    ctx: &mut UpdateContext<'_>,
    id: StoryId,
    result: Result<DecodedStory, Error>,
) -> Task<Message> {
    if !ctx.stories.contains(&id) {
        tracing::debug!(%id, "discarding decode of a removed story");
        ctx.images.finish_decode(id, None);
        let live: HashSet<StoryId> =
            ctx.stories.stories().iter().map(|s| s.id.clone()).collect();
        ctx.images.retain(&live);
        return Task::none();
    }

    match result {
        Ok(decoded) => ctx.images.finish_decode(id, Some(decoded)),
        Err(e) => {
            tracing::warn!(%id, error = %e, "failed to decode story image");
            ctx.images.finish_decode(id, None);
            ctx.notifications
                .push(Notification::warning("notification-image-decode-error"));
        }
    }
    Task::none()
}

// =============================================================================
// Story list
// =============================================================================

pub fn handle_story_list_message(
    ctx: &mut UpdateContext<'_>,
    message: story_list::Message,
) -> Task<Message> {
    match message {
        story_list::Message::AddPressed => open_file_dialog(ctx),
        story_list::Message::Selected(index) => handle_select(ctx, index),
    }
}

/// Opens the viewer at `index`. Out-of-range indices are ignored.
fn handle_select(ctx: &mut UpdateContext<'_>, index: usize) -> Task<Message> {
    let len = ctx.stories.len();
    let Some(selection) = Selection::new(index, len) else {
        tracing::debug!(index, len, "selection out of range");
        return Task::none();
    };
    let Some(story) = ctx.stories.get(index) else {
        return Task::none();
    };

    tracing::debug!(id = %story.id, index, "opening viewer");
    *ctx.selection = Some(selection);
    ctx.viewer
        .open(story.id.clone(), selection.context(len), Instant::now());
    request_decodes(ctx)
}

fn open_file_dialog(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if *ctx.uploading {
        return Task::none();
    }
    *ctx.uploading = true;

    let title = ctx.i18n.tr("file-dialog-title");
    let filter_name = ctx.i18n.tr("file-dialog-images");

    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .set_title(&title)
                .add_filter(&filter_name, IMAGE_EXTENSIONS)
                .pick_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::FileChosen,
    )
}

pub fn handle_file_chosen(ctx: &mut UpdateContext<'_>, path: Option<PathBuf>) -> Task<Message> {
    *ctx.uploading = false;
    match path {
        Some(path) => begin_upload(ctx, path),
        None => Task::none(),
    }
}

pub fn handle_file_dropped(ctx: &mut UpdateContext<'_>, path: PathBuf) -> Task<Message> {
    if *ctx.uploading {
        tracing::debug!(path = %path.display(), "ignoring drop while an upload is in progress");
        return Task::none();
    }
    begin_upload(ctx, path)
}

/// Validates the file type, then encodes the file in the background.
///
/// A rejected file leaves the collection untouched and raises a blocking
/// dialog.
fn begin_upload(ctx: &mut UpdateContext<'_>, path: PathBuf) -> Task<Message> {
    let upload = match UploadFile::from_path(path).validate() {
        Ok(upload) => upload,
        Err(e) => {
            tracing::info!(error = %e, "upload rejected");
            return reject_upload(ctx, e);
        }
    };

    tracing::debug!(path = %upload.path().display(), mime = upload.mime(), "encoding upload");
    *ctx.uploading = true;
    Task::perform(upload::encode(upload), Message::UploadEncoded)
}

fn reject_upload(ctx: &mut UpdateContext<'_>, error: UploadError) -> Task<Message> {
    let declared = match &error {
        UploadError::InvalidUploadType {
            declared_type: Some(ty),
        } => ty.clone(),
        _ => ctx.i18n.tr("upload-type-unknown"),
    };
    let title = ctx.i18n.tr("upload-rejected-title");
    let body = ctx
        .i18n
        .tr_with_args(error.i18n_key(), &[("type", declared.as_str())]);
    *ctx.rejection = Some(error);

    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title(&title)
                .set_description(&body)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::UploadRejectionAcknowledged,
    )
}

pub fn handle_upload_rejection_acknowledged(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    *ctx.rejection = None;
    Task::none()
}

/// Appends and persists the encoded story.
pub fn handle_upload_encoded(
    ctx: &mut UpdateContext<'_>,
    result: Result<String, UploadError>,
) -> Task<Message> {
    *ctx.uploading = false;

    let image_url = match result {
        Ok(image_url) => image_url,
        Err(e) => {
            tracing::warn!(error = %e, "upload could not be encoded");
            ctx.notifications.push(Notification::error(e.i18n_key()));
            return Task::none();
        }
    };

    match ctx.stories.add(image_url) {
        Ok(_) => {
            ctx.notifications
                .push(Notification::info("notification-story-added"));
            follow_displayed_story(ctx);
            request_decodes(ctx)
        }
        Err(_) => {
            ctx.notifications
                .push(Notification::error("notification-storage-write-error"));
            Task::none()
        }
    }
}

// =============================================================================
// Viewer
// =============================================================================

pub fn handle_viewer_message(
    ctx: &mut UpdateContext<'_>,
    message: story_viewer::Message,
) -> Task<Message> {
    match ctx.viewer.handle_message(message) {
        Effect::None => Task::none(),
        Effect::NavigateNext => navigate(ctx, |selection, len| selection.next(len)),
        Effect::NavigatePrevious => navigate(ctx, |selection, len| selection.previous(len)),
        Effect::Close => {
            close_viewer(ctx);
            Task::none()
        }
        Effect::DeleteAndClose(id) => handle_delete(ctx, &id),
    }
}

fn navigate(ctx: &mut UpdateContext<'_>, resolve: fn(Selection, usize) -> Step) -> Task<Message> {
    let Some(selection) = *ctx.selection else {
        return Task::none();
    };
    let len = ctx.stories.len();

    match resolve(selection, len) {
        Step::Show(index) => {
            let Some(story) = ctx.stories.get(index) else {
                close_viewer(ctx);
                return Task::none();
            };
            let Some(next) = Selection::new(index, len) else {
                close_viewer(ctx);
                return Task::none();
            };
            tracing::debug!(id = %story.id, index, "viewer moved");
            *ctx.selection = Some(next);
            ctx.viewer
                .show(story.id.clone(), next.context(len), Instant::now());
            request_decodes(ctx)
        }
        Step::Stay => Task::none(),
        Step::Close => {
            tracing::debug!("navigated past the last story, closing viewer");
            close_viewer(ctx);
            Task::none()
        }
    }
}

fn handle_delete(ctx: &mut UpdateContext<'_>, id: &StoryId) -> Task<Message> {
    close_viewer(ctx);
    match ctx.stories.delete(id) {
        Ok(_) => collection_changed(ctx),
        Err(_) => {
            ctx.notifications
                .push(Notification::error("notification-storage-write-error"));
            Task::none()
        }
    }
}

fn close_viewer(ctx: &mut UpdateContext<'_>) {
    ctx.viewer.close();
    *ctx.selection = None;
}
