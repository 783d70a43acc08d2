// SPDX-License-Identifier: MPL-2.0
//! Decoding story payloads into render handles.
//!
//! Each story produces two images: the full picture for the viewer, and a
//! square thumbnail masked to a circle for the story strip.

use super::data_uri;
use crate::error::{Error, Result};
use iced::widget::image;
use image_rs::imageops::FilterType;
use image_rs::{GenericImageView, RgbaImage};

/// Edge length of the rendered thumbnail in pixels.
///
/// Thumbnails are displayed at half this size so they stay sharp on HiDPI
/// screens.
pub const THUMBNAIL_PIXELS: u32 = 140;

/// Decoded RGBA image with its render handle.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let handle = image::Handle::from_rgba(width, height, pixels);
        Self {
            handle,
            width,
            height,
        }
    }
}

/// Both presentations of one story image.
#[derive(Debug, Clone)]
pub struct DecodedStory {
    pub thumbnail: ImageData,
    pub full: ImageData,
}

/// Decodes a story's `data:` URI into a full image and a circular thumbnail.
///
/// # Errors
///
/// Returns [`Error::Image`] if the URI or the image bytes cannot be decoded.
pub fn decode_story_image(image_url: &str) -> Result<DecodedStory> {
    let uri = data_uri::decode(image_url)?;
    let decoded = image_rs::load_from_memory(&uri.data)?;

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::Image("image has zero size".to_string()));
    }

    let thumbnail = circular_thumbnail(
        &decoded
            .resize_to_fill(THUMBNAIL_PIXELS, THUMBNAIL_PIXELS, FilterType::Triangle)
            .to_rgba8(),
    );
    let full = decoded.to_rgba8();

    Ok(DecodedStory {
        thumbnail: ImageData::from_rgba(thumbnail.width(), thumbnail.height(), thumbnail.into_raw()),
        full: ImageData::from_rgba(width, height, full.into_raw()),
    })
}

/// Clears every pixel outside the inscribed circle.
///
/// Pixels on the edge get partial alpha so the outline is antialiased.
fn circular_thumbnail(square: &RgbaImage) -> RgbaImage {
    let mut masked = square.clone();
    let (width, height) = masked.dimensions();
    let radius = width.min(height) as f32 / 2.0;
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);

    for (x, y, pixel) in masked.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let distance = (dx * dx + dy * dy).sqrt();
        let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
        pixel[3] = (f32::from(pixel[3]) * coverage).round() as u8;
    }

    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_uri(width: u32, height: u32) -> String {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        data_uri::encode("image/png", &bytes)
    }

    #[test]
    fn decode_keeps_full_size_and_builds_square_thumbnail() {
        let decoded = decode_story_image(&png_uri(90, 160)).expect("decode");

        assert_eq!((decoded.full.width, decoded.full.height), (90, 160));
        assert_eq!(
            (decoded.thumbnail.width, decoded.thumbnail.height),
            (THUMBNAIL_PIXELS, THUMBNAIL_PIXELS)
        );
    }

    #[test]
    fn thumbnail_corners_are_transparent_and_centre_opaque() {
        let square = RgbaImage::from_pixel(20, 20, Rgba([1, 2, 3, 255]));
        let masked = circular_thumbnail(&square);

        assert_eq!(masked.get_pixel(0, 0)[3], 0);
        assert_eq!(masked.get_pixel(19, 19)[3], 0);
        assert_eq!(masked.get_pixel(10, 10)[3], 255);
    }

    #[test]
    fn garbage_payload_is_an_image_error() {
        let uri = data_uri::encode("image/png", b"definitely not a png");
        assert!(matches!(decode_story_image(&uri), Err(Error::Image(_))));
    }
}
