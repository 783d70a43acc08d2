// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    /// The persisted story collection could not be parsed.
    StorageCorrupt(String),
    Image(String),
}

/// Reasons an upload can be refused or abandoned.
/// Used to provide user-friendly, localized error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The file's declared type is not an `image/*` type.
    /// `None` when no type could be derived from the file at all.
    InvalidUploadType { declared_type: Option<String> },

    /// The file passed validation but its contents could not be read.
    Unreadable(String),
}

impl UploadError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            UploadError::InvalidUploadType { .. } => "upload-rejected-body",
            UploadError::Unreadable(_) => "notification-upload-read-error",
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::InvalidUploadType {
                declared_type: Some(ty),
            } => write!(f, "Not an image type: {}", ty),
            UploadError::InvalidUploadType { declared_type: None } => {
                write!(f, "Unknown file type")
            }
            UploadError::Unreadable(msg) => write!(f, "Unreadable file: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::StorageCorrupt(e) => write!(f, "Storage Corrupt: {}", e),
            Error::Image(e) => write!(f, "Image Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::StorageCorrupt(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
