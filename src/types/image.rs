use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use super::errors::GenerationError;
use super::gemini::{InlineData, Part};

/// MIME types accepted at the file input boundary.
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Raw image bytes (base64) plus their content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Build a payload from raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self::new(BASE64.encode(bytes), mime_type)
    }

    /// Decode the payload to raw bytes, checking the MIME type along the way.
    pub fn decode(&self) -> Result<Vec<u8>, String> {
        if !self.mime_type.starts_with("image/") {
            return Err(format!("unsupported MIME type '{}'", self.mime_type));
        }
        if self.data.is_empty() {
            return Err("image data is empty".to_string());
        }
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| format!("base64 decode error: {}", e))
    }

    /// `data:<mime>;base64,<data>` form used by the studio page.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A validated generation request. Built fresh per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    image: Option<ImagePayload>,
}

impl GenerationRequest {
    /// Validate the inputs of one generation attempt.
    ///
    /// Missing everything is reported before a missing prompt so the two
    /// messages stay distinct. The prompt is mandatory even with an image.
    pub fn new(prompt: &str, image: Option<ImagePayload>) -> Result<Self, GenerationError> {
        if prompt.is_empty() && image.is_none() {
            return Err(GenerationError::MissingInput);
        }
        if prompt.is_empty() {
            return Err(GenerationError::MissingPrompt);
        }
        if let Some(image) = &image {
            image.decode().map_err(GenerationError::InvalidImage)?;
        }
        Ok(Self {
            prompt: prompt.to_string(),
            image,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    /// Ordered content parts: image first, then text.
    pub fn parts(&self) -> Vec<Part> {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = &self.image {
            parts.push(Part::inline(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            }));
        }
        if !self.prompt.is_empty() {
            parts.push(Part::text(self.prompt.clone()));
        }
        parts
    }
}

/// Outcome of one generation attempt: base64 image bytes or a typed failure.
pub type GenerationResult = Result<String, GenerationError>;
