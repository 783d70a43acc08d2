// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The story strip is always rendered; the viewer is layered on top of it
//! while open, and toasts float above both.

use super::Message;
use crate::domain::Story;
use crate::i18n::fluent::I18n;
use crate::media::ImageCache;
use crate::ui::notifications::{self, Toast};
use crate::ui::story_list;
use crate::ui::story_viewer::{self, Phase};
use iced::widget::{opaque, Container, Stack};
use iced::{Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub stories: &'a [Story],
    pub images: &'a ImageCache,
    pub uploading: bool,
    pub viewer: &'a story_viewer::State,
    pub notifications: &'a notifications::Manager,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let list = story_list::view(
        story_list::ViewContext { i18n: ctx.i18n },
        story_list::ViewModel {
            stories: ctx.stories,
            images: ctx.images,
            uploading: ctx.uploading,
        },
    )
    .map(Message::StoryList);

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(
            Container::new(list)
                .width(Length::Fill)
                .height(Length::Fill),
        );

    if let Some(viewer) = view_viewer(&ctx) {
        layers = layers.push(opaque(viewer));
    }

    layers
        .push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification))
        .into()
}

fn view_viewer<'a>(ctx: &ViewContext<'a>) -> Option<Element<'a, Message>> {
    let id = ctx.viewer.story()?;

    let element = story_viewer::view::view(
        story_viewer::view::ViewContext { i18n: ctx.i18n },
        story_viewer::view::ViewModel {
            image: ctx.images.peek_full(id),
            decode_failed: ctx.images.has_failed(id),
            progress: ctx.viewer.progress().fraction(),
            navigation: ctx.viewer.navigation(),
            confirming_delete: ctx.viewer.phase() == Phase::ConfirmingDelete,
        },
    )
    .map(Message::Viewer);

    Some(element)
}
