//! Gemini REST client.
//!
//! Implements [`GenerativeModelClient`] over `models/{model}:generateContent`.
//! The API key travels in the `x-goog-api-key` header and is supplied per call
//! by the controller that owns it.

use std::future::Future;

use serde::Deserialize;

use crate::types::errors::ClientError;
use crate::types::gemini::{GenerateContentRequest, GenerateContentResponse};
use crate::types::settings::StudioSettings;

/// Capability of an external generative model.
pub trait GenerativeModelClient: Send + Sync {
    /// Submit one request and return the raw model response.
    fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> impl Future<Output = Result<GenerateContentResponse, ClientError>> + Send;
}

/// Provider error envelope: `{"error": {"code", "message", "status", "details"}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// `reqwest`-backed Gemini client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_base_url: &str, model: &str) -> Self {
        Self::with_http(reqwest::Client::new(), api_base_url, model)
    }

    /// Use a preconfigured HTTP client (proxy, timeouts).
    pub fn with_http(http: reqwest::Client, api_base_url: &str, model: &str) -> Self {
        Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_settings(settings: &StudioSettings) -> Self {
        Self::new(&settings.api_base_url, &settings.model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the generate endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, self.model)
    }

    /// Flatten a provider error body into one diagnostic line.
    ///
    /// Reasons such as `API_KEY_INVALID` are kept so the caller can classify.
    fn describe_error(body: &str) -> String {
        match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => {
                let reasons: Vec<&str> = envelope
                    .error
                    .details
                    .iter()
                    .filter_map(|d| d.reason.as_deref())
                    .collect();
                if reasons.is_empty() {
                    format!("{}: {}", envelope.error.status, envelope.error.message)
                } else {
                    format!(
                        "{}: {} [{}]",
                        envelope.error.status,
                        envelope.error.message,
                        reasons.join(", ")
                    )
                }
            }
            Err(_) => body.to_string(),
        }
    }
}

impl GenerativeModelClient for GeminiClient {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: Self::describe_error(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
