//! File input boundary for the studio.
//!
//! Only png, jpeg and webp images are accepted. The type is checked before
//! anything is read, so a rejected file and an unreadable file report
//! different errors.

use std::fs;
use std::path::Path;

use crate::types::errors::ImageInputError;
use crate::types::image::{ImagePayload, SUPPORTED_MIME_TYPES};

/// MIME type of a supported image file, judged by its extension.
pub fn mime_type_for_path(path: &Path) -> Result<&'static str, ImageInputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        _ => Err(ImageInputError::UnsupportedType(path.display().to_string())),
    }
}

/// Read an image file into a payload.
pub fn load_image_file(path: &Path) -> Result<ImagePayload, ImageInputError> {
    let mime_type = mime_type_for_path(path)?;
    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), mime_type, "loaded input image");
    Ok(ImagePayload::from_bytes(&bytes, mime_type))
}

/// Split a `data:<mime>;base64,<data>` URL into a payload.
pub fn parse_data_url(data_url: &str) -> Result<ImagePayload, ImageInputError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or(ImageInputError::MalformedDataUrl)?;
    let (header, data) = rest
        .split_once(',')
        .ok_or(ImageInputError::MalformedDataUrl)?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().to_ascii_lowercase();
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) || data.is_empty() {
        return Err(ImageInputError::MalformedDataUrl);
    }
    if !SUPPORTED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(ImageInputError::UnsupportedType(mime_type));
    }

    Ok(ImagePayload::new(data, mime_type))
}
