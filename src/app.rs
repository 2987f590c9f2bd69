//! App Core for Banana Studio.
//!
//! Holds the settings engine and the image generator shared by the GUI, the
//! console mode and the RPC server.

use std::sync::Arc;

use crate::services::gemini_client::{GeminiClient, GenerativeModelClient};
use crate::services::image_generator::ImageGenerator;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::SettingsError;

/// Central application struct.
pub struct App<C = GeminiClient> {
    pub settings_engine: SettingsEngine,
    pub generator: Arc<ImageGenerator<C>>,
}

impl App<GeminiClient> {
    /// Loads settings, reads the API key from the environment once and
    /// builds the Gemini-backed generator.
    pub fn new(config_path: Option<String>) -> Result<Self, SettingsError> {
        let mut settings_engine = SettingsEngine::new(config_path);
        let settings = settings_engine.load()?;
        let api_key = settings_engine.read_api_key();
        let client = GeminiClient::from_settings(&settings);
        tracing::info!(model = %settings.model, config = %settings_engine.get_config_path(), "studio configured");
        Ok(Self::with_client(settings_engine, client, api_key))
    }
}

impl<C: GenerativeModelClient> App<C> {
    pub fn with_client(settings_engine: SettingsEngine, client: C, api_key: Option<String>) -> Self {
        Self {
            settings_engine,
            generator: Arc::new(ImageGenerator::new(client, api_key)),
        }
    }
}
