// SPDX-License-Identifier: MPL-2.0
//! Horizontal strip of story thumbnails with an "add" button at its head.

use crate::domain::Story;
use crate::i18n::fluent::I18n;
use crate::media::ImageCache;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use chrono::{DateTime, Local, Utc};
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{button, image, Column, Container, Row, Scrollable, Space, Text};
use iced::{alignment::Horizontal, ContentFit, Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    AddPressed,
    Selected(usize),
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

pub struct ViewModel<'a> {
    pub stories: &'a [Story],
    pub images: &'a ImageCache,
    /// An upload is being read; the add button is disabled meanwhile.
    pub uploading: bool,
}

pub fn view<'a>(ctx: ViewContext<'a>, model: ViewModel<'a>) -> Element<'a, Message> {
    let mut strip = Row::new()
        .spacing(spacing::SM)
        .padding([spacing::XS, spacing::MD])
        .push(add_cell(ctx.i18n, model.uploading));

    for (index, story) in model.stories.iter().enumerate() {
        strip = strip.push(story_cell(index, story, model.images));
    }

    let scroller = Scrollable::new(strip)
        .direction(Direction::Horizontal(Scrollbar::new().width(4).scroller_width(4)))
        .width(Length::Fill);

    let mut content = Column::new()
        .spacing(spacing::SM)
        .padding(spacing::MD)
        .push(Text::new(ctx.i18n.tr("stories-heading")).size(typography::TITLE_MD))
        .push(scroller);

    if model.stories.is_empty() {
        content = content.push(Text::new(ctx.i18n.tr("stories-empty")).size(typography::BODY));
    }

    content
        .push(Space::new().height(Length::Fill))
        .push(Text::new(ctx.i18n.tr("stories-hint")).size(typography::CAPTION))
        .into()
}

/// Creation time shown under a thumbnail, in local time.
#[must_use]
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

fn add_cell<'a>(i18n: &I18n, uploading: bool) -> Element<'a, Message> {
    let ring = sizing::THUMBNAIL + 2.0 * sizing::THUMBNAIL_RING;
    let add = button(
        Text::new("+")
            .size(typography::TITLE_MD)
            .align_x(Horizontal::Center)
            .align_y(iced::alignment::Vertical::Center),
    )
    .width(Length::Fixed(ring))
    .height(Length::Fixed(ring))
    .on_press_maybe((!uploading).then_some(Message::AddPressed))
    .style(styles::button::add_story);

    cell(add.into(), i18n.tr("add-story-label"))
}

fn story_cell<'a>(index: usize, story: &'a Story, images: &'a ImageCache) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match images.thumbnail(&story.id) {
        Some(data) => image(data.handle.clone())
            .content_fit(ContentFit::Cover)
            .width(Length::Fixed(sizing::THUMBNAIL))
            .height(Length::Fixed(sizing::THUMBNAIL))
            .into(),
        None => Container::new(Space::new())
            .width(Length::Fixed(sizing::THUMBNAIL))
            .height(Length::Fixed(sizing::THUMBNAIL))
            .style(styles::container::thumbnail_placeholder)
            .into(),
    };

    let ringed = Container::new(picture)
        .padding(sizing::THUMBNAIL_RING)
        .style(styles::container::story_ring);

    let thumbnail = button(ringed)
        .padding(0)
        .on_press(Message::Selected(index))
        .style(styles::button::thumbnail);

    cell(thumbnail.into(), format_time(story.timestamp))
}

fn cell<'a>(content: Element<'a, Message>, label: String) -> Element<'a, Message> {
    Column::new()
        .width(Length::Fixed(sizing::STORY_CELL_WIDTH))
        .spacing(spacing::XXS)
        .align_x(Horizontal::Center)
        .push(content)
        .push(Text::new(label).size(typography::CAPTION))
        .into()
}
