// SPDX-License-Identifier: MPL-2.0
//! `data:` URI codec for story payloads.
//!
//! Only the base64 form is produced: `data:<mime>;base64,<payload>`.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub data: Vec<u8>,
}

/// Encodes `bytes` as a base64 `data:` URI with the given MIME type.
#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("{SCHEME}{mime}{BASE64_MARKER},{}", STANDARD.encode(bytes))
}

/// Decodes a base64 `data:` URI.
///
/// # Errors
///
/// Returns [`Error::Image`] if `uri` is not a base64 `data:` URI or its
/// payload is not valid base64.
pub fn decode(uri: &str) -> Result<DataUri> {
    let rest = uri
        .strip_prefix(SCHEME)
        .ok_or_else(|| Error::Image("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Image("data URI has no payload separator".to_string()))?;
    let mime = header
        .strip_suffix(BASE64_MARKER)
        .ok_or_else(|| Error::Image("data URI is not base64 encoded".to_string()))?;

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::Image(format!("invalid base64 payload: {e}")))?;

    Ok(DataUri {
        mime: mime.to_string(),
        data,
    })
}
