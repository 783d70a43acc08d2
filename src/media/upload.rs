// SPDX-License-Identifier: MPL-2.0
//! Upload validation and asynchronous encoding.
//!
//! A file is accepted only if its declared type is an `image/*` type. The
//! declared type comes from the file extension, looked up in the `image`
//! crate's format table. Validation is synchronous; encoding the contents
//! into a `data:` URI happens later on the async runtime.

use super::data_uri;
use crate::error::UploadError;
use image_rs::ImageFormat;
use std::path::{Path, PathBuf};

/// Extensions offered in the file picker.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp", "ico",
];

/// A file the user picked or dropped, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    path: PathBuf,
    declared_type: Option<String>,
}

impl UploadFile {
    /// Wraps `path`, deriving the declared type from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let declared_type = declared_mime(&path);
        Self {
            path,
            declared_type,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    /// Checks the declared type.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidUploadType`] when the declared type is
    /// missing or not an `image/*` type.
    pub fn validate(self) -> Result<ValidatedUpload, UploadError> {
        match self.declared_type {
            Some(mime) if is_image_type(&mime) => Ok(ValidatedUpload {
                path: self.path,
                mime,
            }),
            declared_type => Err(UploadError::InvalidUploadType { declared_type }),
        }
    }
}

/// A file whose declared type is an image type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    path: PathBuf,
    mime: String,
}

impl ValidatedUpload {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }
}

/// MIME type implied by the extension of `path`.
#[must_use]
pub fn declared_mime(path: &Path) -> Option<String> {
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

fn is_image_type(mime: &str) -> bool {
    mime.strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Reads the file and encodes it as a `data:` URI.
///
/// # Errors
///
/// Returns [`UploadError::Unreadable`] if the file cannot be read.
pub async fn encode(upload: ValidatedUpload) -> Result<String, UploadError> {
    let bytes = tokio::fs::read(&upload.path).await.map_err(|e| {
        tracing::warn!(path = %upload.path.display(), error = %e, "failed to read upload");
        UploadError::Unreadable(e.to_string())
    })?;

    tracing::debug!(
        path = %upload.path.display(),
        bytes = bytes.len(),
        mime = %upload.mime,
        "upload encoded"
    );
    Ok(data_uri::encode(&upload.mime, &bytes))
}
