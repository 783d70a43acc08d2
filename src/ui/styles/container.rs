// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{opacity, palette, radius, shadow};
use iced::gradient::{self, Gradient};
use iced::widget::container;
use iced::{Background, Border, Color, Degrees, Theme};

/// Generic panel surface used for dialogs.
///
/// The color is derived from the active Iced `Theme` background, with a slight
/// opacity, so panels stay readable in both light and dark modes without
/// hard-coding colors.
pub fn panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    let base = palette.background.base.color;

    container::Style {
        background: Some(Background::Color(Color::from_rgba(
            base.r,
            base.g,
            base.b,
            opacity::SURFACE,
        ))),
        text_color: Some(palette.background.base.text),
        border: Border {
            radius: radius::LG.into(),
            ..Default::default()
        },
        shadow: shadow::MD,
        ..Default::default()
    }
}

/// Full-window dark backdrop behind the story frame.
pub fn viewer_backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_PRESSED,
            ..palette::BLACK
        })),
        text_color: Some(palette::WHITE),
        ..Default::default()
    }
}

/// The 9:16 frame holding the story image.
pub fn story_frame(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BLACK)),
        text_color: Some(palette::WHITE),
        border: Border {
            radius: radius::MD.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Unfilled part of the progress bar.
pub fn progress_track(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_MEDIUM,
            ..palette::WHITE
        })),
        border: Border {
            radius: radius::FULL.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Filled part of the progress bar.
pub fn progress_fill(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::WHITE)),
        border: Border {
            radius: radius::FULL.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Gradient ring drawn behind a story thumbnail.
pub fn story_ring(_theme: &Theme) -> container::Style {
    let ring = Gradient::Linear(
        gradient::Linear::new(Degrees(45.0))
            .add_stop(0.0, palette::RING_START)
            .add_stop(0.5, palette::RING_MID)
            .add_stop(1.0, palette::RING_END),
    );

    container::Style {
        background: Some(Background::Gradient(ring)),
        border: Border {
            radius: radius::FULL.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Placeholder disc shown while a thumbnail is decoding.
pub fn thumbnail_placeholder(theme: &Theme) -> container::Style {
    let weak = theme.extended_palette().background.weak.color;
    container::Style {
        background: Some(Background::Color(weak)),
        border: Border {
            radius: radius::FULL.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_ring_is_a_gradient() {
        let style = story_ring(&Theme::Dark);
        assert!(matches!(style.background, Some(Background::Gradient(_))));
    }

    #[test]
    fn backdrop_is_mostly_opaque_black() {
        let style = viewer_backdrop(&Theme::Light);
        match style.background {
            Some(Background::Color(color)) => {
                assert_eq!(color.r, 0.0);
                assert!(color.a >= opacity::OVERLAY_STRONG);
            }
            _ => panic!("Expected background color"),
        }
    }
}
