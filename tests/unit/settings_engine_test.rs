//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, value persistence, and reset behavior.

use banana_studio::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use banana_studio::types::errors::SettingsError;
use banana_studio::types::settings::StudioSettings;
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

/// When no config file exists on disk, `load()` must return the built-in
/// defaults so the studio can start without prior configuration.
#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, StudioSettings::default());
    assert_eq!(settings.model, "gemini-2.5-flash-image");
    assert_eq!(settings.api_key_env, "API_KEY");
}

/// After calling `set_value`, a new engine reading the same file sees the update.
#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("model", serde_json::Value::String("gemini-2.0-flash-exp".to_string()))
            .unwrap();
    }

    {
        let mut engine2 = engine_in_temp(&dir);
        let loaded = engine2.load().unwrap();
        assert_eq!(loaded.model, "gemini-2.0-flash-exp");
    }
}

/// `reset()` reverts every value and persists the defaults.
#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("home_url", serde_json::json!("https://example.com"))
        .unwrap();
    engine
        .set_value("api_key_env", serde_json::json!("GEMINI_KEY"))
        .unwrap();

    engine.reset().unwrap();
    assert_eq!(engine.get_settings(), &StudioSettings::default());

    let mut fresh = engine_in_temp(&dir);
    assert_eq!(fresh.load().unwrap(), StudioSettings::default());
}

#[test]
fn test_unknown_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let err = engine.set_value("theme", serde_json::json!("dark")).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));

    let err = engine.set_value("", serde_json::json!("x")).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
}

/// A value of the wrong type leaves the settings untouched.
#[test]
fn test_wrong_value_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let err = engine.set_value("model", serde_json::json!(42)).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));
    assert_eq!(engine.get_settings().model, "gemini-2.5-flash-image");
}

/// Fields missing from an older file fall back to their defaults.
#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), r#"{"model":"custom-model"}"#).unwrap();

    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();
    assert_eq!(settings.model, "custom-model");
    assert_eq!(settings.home_url, "https://www.google.com");
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

    let mut engine = engine_in_temp(&dir);
    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

/// Saving creates missing parent directories.
#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");
    let engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));

    engine.save().unwrap();
    assert!(path.exists());
}

/// The persisted file never carries the credential, only the variable name.
#[test]
fn test_saved_file_holds_no_key() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);
    engine.save().unwrap();

    let content = std::fs::read_to_string(engine.get_config_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["api_key_env"], "API_KEY");
    assert!(json.get("api_key").is_none());
}

#[test]
fn test_read_api_key_from_configured_variable() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("api_key_env", serde_json::json!("BANANA_STUDIO_TEST_KEY_PRESENT"))
        .unwrap();

    std::env::set_var("BANANA_STUDIO_TEST_KEY_PRESENT", "abc123");
    assert_eq!(engine.read_api_key().as_deref(), Some("abc123"));

    std::env::set_var("BANANA_STUDIO_TEST_KEY_PRESENT", "   ");
    assert_eq!(engine.read_api_key(), None);
    std::env::remove_var("BANANA_STUDIO_TEST_KEY_PRESENT");
}
