// SPDX-License-Identifier: MPL-2.0
//! Story media: upload intake, `data:` URI payloads and decoded images.

pub mod cache;
pub mod data_uri;
pub mod image;
pub mod upload;

pub use cache::ImageCache;
pub use image::{decode_story_image, DecodedStory, ImageData, THUMBNAIL_PIXELS};
pub use upload::{UploadFile, ValidatedUpload, IMAGE_EXTENSIONS};
