// SPDX-License-Identifier: MPL-2.0
//! Full-screen story presentation.
//!
//! Layout, back to front: dark backdrop, 9:16 frame with the story image,
//! progress bar and top controls, side navigation buttons, and the delete
//! confirmation dialog when open.

use super::component::Message;
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::stories::NavigationContext;
use crate::ui::design_tokens::{opacity, palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{
    button, center, container, image, mouse_area, opaque, responsive, Column, Container, Row,
    Space, Stack, Text,
};
use iced::{
    alignment::{Horizontal, Vertical},
    Color, ContentFit, Element, Length, Point, Rectangle, Size,
};

/// The story image fills the whole frame, cropping whatever overflows.
const STORY_FIT: ContentFit = ContentFit::Cover;

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

pub struct ViewModel<'a> {
    /// Decoded full-size image, `None` while decoding or after a failure.
    pub image: Option<&'a ImageData>,
    pub decode_failed: bool,
    /// Progress on the 0–1 scale.
    pub progress: f32,
    pub navigation: NavigationContext,
    pub confirming_delete: bool,
}

pub fn view<'a>(ctx: ViewContext<'a>, model: ViewModel<'a>) -> Element<'a, Message> {
    responsive(move |available: Size| view_inner(&ctx, &model, available)).into()
}

/// Largest 9:16 frame that fits `available`, capped at the maximum width.
#[must_use]
pub fn frame_size(available: Size) -> Size {
    let width = available
        .width
        .min(sizing::VIEWER_MAX_WIDTH)
        .min(available.height * sizing::VIEWER_ASPECT)
        .max(0.0);
    Size::new(width, width / sizing::VIEWER_ASPECT)
}

/// Where the story frame sits inside a viewport of size `available`.
#[must_use]
pub fn frame_bounds(available: Size) -> Rectangle {
    let frame = frame_size(available);
    Rectangle::new(
        Point::new(
            (available.width - frame.width) / 2.0,
            (available.height - frame.height) / 2.0,
        ),
        frame,
    )
}

fn view_inner<'a>(
    ctx: &ViewContext<'a>,
    model: &ViewModel<'a>,
    available: Size,
) -> Element<'a, Message> {
    let frame = frame_size(available);

    let media: Element<'a, Message> = match model.image {
        Some(data) => image(data.handle.clone())
            .content_fit(STORY_FIT)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => {
            let key = if model.decode_failed {
                "viewer-image-error"
            } else {
                "viewer-image-loading"
            };
            center(Text::new(ctx.i18n.tr(key)).size(typography::BODY)).into()
        }
    };

    // The whole story surface pauses playback while pressed
    let surface = mouse_area(
        Container::new(media)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .on_press(Message::PointerPressed)
    .on_release(Message::PointerReleased)
    .on_exit(Message::PointerLeft);

    let bar_width = (frame.width - 2.0 * spacing::XS).max(0.0);
    let top = Column::new()
        .spacing(spacing::XS)
        .padding(spacing::XS)
        .push(progress_bar(model.progress, bar_width))
        .push(
            Row::new()
                .spacing(spacing::XS)
                .push(Space::new().width(Length::Fill))
                .push(
                    button(Text::new(ctx.i18n.tr("viewer-delete")).size(typography::CAPTION))
                        .padding([spacing::XS, spacing::SM])
                        .on_press(Message::DeletePressed)
                        .style(overlay_style()),
                )
                .push(control_button("×", Message::ClosePressed)),
        );

    let mut frame_layers = Stack::new().push(surface).push(top);

    if model.navigation.has_prev {
        frame_layers =
            frame_layers.push(side_button("‹", Message::PreviousPressed, Horizontal::Left));
    }
    if model.navigation.has_next {
        frame_layers =
            frame_layers.push(side_button("›", Message::NextPressed, Horizontal::Right));
    }

    let story_frame = Container::new(frame_layers)
        .width(Length::Fixed(frame.width))
        .height(Length::Fixed(frame.height))
        .clip(true)
        .style(styles::container::story_frame);

    let mut layers = Stack::new().push(
        Container::new(story_frame)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .style(styles::container::viewer_backdrop),
    );

    if model.confirming_delete {
        layers = layers.push(confirm_dialog(ctx.i18n));
    }

    layers.into()
}

fn progress_bar<'a>(fraction: f32, width: f32) -> Element<'a, Message> {
    let filled = (width * fraction.clamp(0.0, 1.0)).max(0.0);

    Stack::new()
        .push(
            Container::new(Space::new())
                .width(Length::Fixed(width))
                .height(Length::Fixed(sizing::PROGRESS_BAR_HEIGHT))
                .style(styles::container::progress_track),
        )
        .push(
            Container::new(Space::new())
                .width(Length::Fixed(filled))
                .height(Length::Fixed(sizing::PROGRESS_BAR_HEIGHT))
                .style(styles::container::progress_fill),
        )
        .into()
}

fn control_button<'a>(glyph: &'a str, message: Message) -> Element<'a, Message> {
    button(
        Text::new(glyph)
            .size(typography::BODY_LG)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center),
    )
    .width(Length::Fixed(sizing::CONTROL_BUTTON))
    .height(Length::Fixed(sizing::CONTROL_BUTTON))
    .on_press(message)
    .style(overlay_style())
    .into()
}

fn overlay_style() -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    styles::button::overlay(palette::WHITE, opacity::OVERLAY_MEDIUM, opacity::OVERLAY_HOVER)
}

fn side_button<'a>(glyph: &'a str, message: Message, side: Horizontal) -> Element<'a, Message> {
    Container::new(control_button(glyph, message))
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing::XS)
        .align_x(side)
        .align_y(Vertical::Center)
        .into()
}

fn confirm_dialog<'a>(i18n: &I18n) -> Element<'a, Message> {
    let actions = Row::new()
        .spacing(spacing::SM)
        .push(Space::new().width(Length::Fill))
        .push(
            button(Text::new(i18n.tr("delete-confirm-cancel")).size(typography::BODY))
                .padding([spacing::XS, spacing::MD])
                .on_press(Message::DeleteCancelled)
                .style(styles::button::secondary),
        )
        .push(
            button(Text::new(i18n.tr("delete-confirm-delete")).size(typography::BODY))
                .padding([spacing::XS, spacing::MD])
                .on_press(Message::DeleteConfirmed)
                .style(styles::button::danger),
        );

    let dialog = Container::new(
        Column::new()
            .spacing(spacing::MD)
            .push(Text::new(i18n.tr("delete-confirm-title")).size(typography::TITLE_SM))
            .push(Text::new(i18n.tr("delete-confirm-body")).size(typography::BODY))
            .push(actions),
    )
    .width(Length::Fixed(sizing::DIALOG_WIDTH))
    .padding(spacing::LG)
    .style(styles::container::panel);

    // Scrim blocks clicks on the viewer underneath
    opaque(
        center(dialog).style(|_theme: &iced::Theme| container::Style {
            background: Some(iced::Background::Color(Color {
                a: opacity::OVERLAY_MEDIUM,
                ..palette::BLACK
            })),
            ..Default::default()
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_limited_by_height_on_wide_windows() {
        let frame = frame_size(Size::new(1920.0, 640.0));
        assert!((frame.height - 640.0).abs() < 0.01);
        assert!((frame.width - 360.0).abs() < 0.01);
    }

    #[test]
    fn frame_is_capped_at_max_width() {
        let frame = frame_size(Size::new(2000.0, 4000.0));
        assert_eq!(frame.width, sizing::VIEWER_MAX_WIDTH);
    }

    #[test]
    fn frame_bounds_are_centered() {
        let bounds = frame_bounds(Size::new(1000.0, 800.0));
        assert_eq!(bounds.width, sizing::VIEWER_MAX_WIDTH);
        assert!((bounds.x - 276.0).abs() < 0.01);
        assert!((bounds.y - (800.0 - bounds.height) / 2.0).abs() < 0.01);
        assert!(bounds.contains(Point::new(500.0, 400.0)));
        assert!(!bounds.contains(Point::new(50.0, 400.0)));
    }

    #[test]
    fn landscape_story_fills_the_frame() {
        let frame = frame_size(Size::new(480.0, 800.0));
        let drawn = STORY_FIT.fit(Size::new(1600.0, 900.0), frame);

        assert!((drawn.height - frame.height).abs() < 0.01);
        assert!(drawn.width >= frame.width);
    }

    #[test]
    fn frame_fills_narrow_windows() {
        let frame = frame_size(Size::new(300.0, 900.0));
        assert_eq!(frame.width, 300.0);
        assert!((frame.height - 533.333).abs() < 0.01);
    }
}
