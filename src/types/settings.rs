use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_HOME_URL: &str = "https://www.google.com";

/// Persisted studio configuration. Never holds the API key itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudioSettings {
    /// Model used for generation and editing.
    pub model: String,
    /// Root of the generative language REST API.
    pub api_base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// First page of the browser view.
    pub home_url: String,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
        }
    }
}
