use serde::{Deserialize, Serialize};
use thiserror::Error;

// === ErrorKind ===

/// Stable classification of a failed generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingInput,
    MissingPrompt,
    InvalidImage,
    NoImageInResponse,
    InvalidCredential,
    MissingCredential,
    GenerationFailed,
}

// === GenerationError ===

/// Errors surfaced by the image request controller.
///
/// `Display` is the user-safe message. Diagnostic detail for transport
/// failures is kept in the variant and logged, never shown verbatim.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Neither a prompt nor an image was supplied.
    #[error("Please provide a prompt or an image to start.")]
    MissingInput,
    /// An image was supplied without a prompt.
    #[error("A text prompt is required for generation or editing.")]
    MissingPrompt,
    /// The supplied image could not be decoded to bytes and a MIME type.
    #[error("The uploaded image could not be decoded.")]
    InvalidImage(String),
    /// The model answered without any inline image part.
    #[error("No image data found in the API response.")]
    NoImageInResponse,
    /// The provider rejected the API key.
    #[error("The provided API key is invalid. Please check your environment configuration.")]
    InvalidCredential,
    /// The controller was constructed without an API key.
    #[error("API key is not configured. Set the API_KEY environment variable.")]
    MissingCredential,
    /// Any other transport or provider failure.
    #[error("Failed to generate image. Please check the logs for more details.")]
    GenerationFailed { detail: String },
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::MissingInput => ErrorKind::MissingInput,
            GenerationError::MissingPrompt => ErrorKind::MissingPrompt,
            GenerationError::InvalidImage(_) => ErrorKind::InvalidImage,
            GenerationError::NoImageInResponse => ErrorKind::NoImageInResponse,
            GenerationError::InvalidCredential => ErrorKind::InvalidCredential,
            GenerationError::MissingCredential => ErrorKind::MissingCredential,
            GenerationError::GenerationFailed { .. } => ErrorKind::GenerationFailed,
        }
    }

    /// Underlying diagnostic text, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            GenerationError::InvalidImage(detail) => Some(detail),
            GenerationError::GenerationFailed { detail } => Some(detail),
            _ => None,
        }
    }
}

// === ClientError ===

/// Errors returned by a generative model client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },
    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether the provider rejected the credential itself.
    pub fn is_invalid_credential(&self) -> bool {
        match self {
            ClientError::Api { message, .. } => message.contains("API_KEY_INVALID"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

// === ImageInputError ===

/// Errors at the file input boundary.
#[derive(Debug, Error)]
pub enum ImageInputError {
    /// The file is not a png, jpeg or webp image. Raised before reading.
    #[error("Please upload a valid image file (PNG, JPG, etc.).")]
    UnsupportedType(String),
    /// The file could not be read.
    #[error("Failed to read the image file.")]
    ReadFailed(#[from] std::io::Error),
    /// A data URL did not carry a base64 payload.
    #[error("Could not extract base64 data from the uploaded image.")]
    MalformedDataUrl,
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
