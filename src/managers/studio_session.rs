use serde::Serialize;

use crate::types::errors::{GenerationError, ImageInputError};
use crate::types::image::{GenerationRequest, GenerationResult, ImagePayload};

/// What the studio output panel shows. At most one of image or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioOutput<'a> {
    Empty,
    Loading,
    Error(&'a str),
    Image(&'a str),
}

/// Interaction state of the image studio.
///
/// Mirrors the studio panel: prompt, optional input image, the last result
/// and the single visible error. A new outcome always replaces the previous
/// one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudioSession {
    prompt: String,
    input_image: Option<ImagePayload>,
    generated_image: Option<String>,
    error: Option<String>,
    is_loading: bool,
}

impl StudioSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn input_image(&self) -> Option<&ImagePayload> {
        self.input_image.as_ref()
    }

    /// Attach a decoded image. Clears any visible error.
    pub fn attach_image(&mut self, image: ImagePayload) {
        self.input_image = Some(image);
        self.error = None;
    }

    /// Record a rejected or unreadable file. The current image stays.
    pub fn reject_image(&mut self, err: &ImageInputError) {
        tracing::warn!(error = ?err, "input image rejected");
        self.error = Some(err.to_string());
    }

    pub fn clear_input_image(&mut self) {
        self.input_image = None;
    }

    /// Data URL of the last generated image.
    pub fn generated_image(&self) -> Option<&str> {
        self.generated_image.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the generate trigger should be enabled.
    pub fn can_generate(&self) -> bool {
        !self.is_loading && !self.prompt.is_empty()
    }

    /// Validate the current inputs and enter the loading state.
    ///
    /// On a validation failure the error becomes the visible outcome and the
    /// session stays idle.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, GenerationError> {
        match GenerationRequest::new(&self.prompt, self.input_image.clone()) {
            Ok(request) => {
                self.is_loading = true;
                self.error = None;
                self.generated_image = None;
                Ok(request)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Record the outcome of the request started by `begin_generation`.
    ///
    /// A result arriving after the session left the loading state (for
    /// example after `clear`) is dropped. Returns whether it was applied.
    pub fn finish_generation(&mut self, result: GenerationResult) -> bool {
        if !self.is_loading {
            tracing::debug!(ok = result.is_ok(), "dropping result for a cleared request");
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(data) => {
                self.generated_image = Some(format!("data:image/png;base64,{}", data));
                self.error = None;
            }
            Err(err) => {
                self.generated_image = None;
                self.error = Some(err.to_string());
            }
        }
        true
    }

    /// Reset prompt, image, result, error and loading flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn output(&self) -> StudioOutput<'_> {
        if self.is_loading {
            StudioOutput::Loading
        } else if let Some(err) = &self.error {
            StudioOutput::Error(err)
        } else if let Some(image) = &self.generated_image {
            StudioOutput::Image(image)
        } else {
            StudioOutput::Empty
        }
    }
}
