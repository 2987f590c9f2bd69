//! Image Request Controller.
//!
//! Validates one prompt/image pair, submits a single image-only request to the
//! model client and classifies the outcome. There are no retries: a failed
//! attempt is reported to the caller, who may re-issue it.

use tracing::Instrument;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::services::gemini_client::GenerativeModelClient;
use crate::types::errors::GenerationError;
use crate::types::gemini::GenerateContentRequest;
use crate::types::image::{GenerationRequest, GenerationResult, ImagePayload};

/// Generates or edits images through a [`GenerativeModelClient`].
///
/// The credential is handed in at construction. A controller built without
/// one fails every valid request with [`GenerationError::MissingCredential`].
pub struct ImageGenerator<C> {
    client: C,
    api_key: Option<Zeroizing<String>>,
}

impl<C: GenerativeModelClient> ImageGenerator<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .map(Zeroizing::new);
        if api_key.is_none() {
            tracing::warn!("image generator created without an API key");
        }
        Self { client, api_key }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Generate a new image from `prompt`, or edit `image` according to it.
    ///
    /// Returns the base64 bytes of the first inline image in the response,
    /// untouched.
    pub async fn generate(&self, prompt: &str, image: Option<ImagePayload>) -> GenerationResult {
        let span = tracing::info_span!("generate", request_id = %Uuid::new_v4());
        self.generate_inner(prompt, image).instrument(span).await
    }

    async fn generate_inner(&self, prompt: &str, image: Option<ImagePayload>) -> GenerationResult {
        let request = GenerationRequest::new(prompt, image).map_err(|err| {
            tracing::warn!(kind = ?err.kind(), detail = err.detail().unwrap_or(""), "rejected generation request: {}", err);
            err
        })?;

        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::MissingCredential)?;

        let body = GenerateContentRequest::image_only(request.parts());
        tracing::info!(
            parts = body.parts().len(),
            with_image = request.image().is_some(),
            "submitting generation request"
        );

        match self.client.generate_content(api_key.as_str(), &body).await {
            Ok(response) => match response.first_inline_data() {
                Some(inline) => {
                    tracing::info!(mime_type = %inline.mime_type, "generation succeeded");
                    Ok(inline.data.clone())
                }
                None => {
                    tracing::warn!("model response carried no inline image");
                    Err(GenerationError::NoImageInResponse)
                }
            },
            Err(err) => {
                tracing::error!(error = %err, "generation call failed");
                if err.is_invalid_credential() {
                    Err(GenerationError::InvalidCredential)
                } else {
                    Err(GenerationError::GenerationFailed {
                        detail: err.to_string(),
                    })
                }
            }
        }
    }
}
