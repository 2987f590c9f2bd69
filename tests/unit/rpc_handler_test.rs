//! Unit tests for the RPC handler: all JSON-RPC methods dispatched by `handle_method`.
//!
//! These tests exercise every RPC method through the same code path used by the
//! real `banana-studio-rpc` binary, with a canned model client and a settings
//! file in a temporary directory.

use std::sync::Mutex;

use serde_json::json;
use tempfile::TempDir;

use banana_studio::app::App;
use banana_studio::rpc_handler::handle_method;
use banana_studio::services::gemini_client::GenerativeModelClient;
use banana_studio::services::settings_engine::SettingsEngine;
use banana_studio::types::errors::{ClientError, ErrorKind};
use banana_studio::types::gemini::{GenerateContentRequest, GenerateContentResponse, InlineData, Part};

/// Answers every request with one PNG part, or with a fixed API error.
struct CannedClient {
    fail_with: Option<String>,
}

impl GenerativeModelClient for CannedClient {
    async fn generate_content(
        &self,
        _api_key: &str,
        _request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        match &self.fail_with {
            Some(message) => Err(ClientError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(GenerateContentResponse::from_parts(vec![Part::inline(InlineData {
                mime_type: "image/png".to_string(),
                data: "R0VORVJBVEVE".to_string(),
            })])),
        }
    }
}

fn setup_with(client: CannedClient, api_key: Option<&str>) -> (Mutex<App<CannedClient>>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("settings.json").to_string_lossy().to_string();
    let engine = SettingsEngine::new(Some(path));
    let app = App::with_client(engine, client, api_key.map(str::to_string));
    (Mutex::new(app), tmp)
}

fn setup() -> (Mutex<App<CannedClient>>, TempDir) {
    setup_with(CannedClient { fail_with: None }, Some("test-key"))
}

// ─── Ping ───

#[tokio::test]
async fn test_ping() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "ping", &json!({})).await.unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method ───

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "nonexistent.method", &json!({})).await.unwrap_err();
    assert_eq!(err.message, "unknown method: nonexistent.method");
    assert_eq!(err.kind, None);
}

// ─── Generation ───

#[tokio::test]
async fn test_generate_returns_data_and_data_url() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "image.generate", &json!({"prompt": "a banana"}))
        .await
        .unwrap();
    assert_eq!(res["data"], "R0VORVJBVEVE");
    assert_eq!(res["dataUrl"], "data:image/png;base64,R0VORVJBVEVE");
}

#[tokio::test]
async fn test_generate_with_image() {
    let (app, _tmp) = setup();
    let res = handle_method(
        &app,
        "image.generate",
        &json!({
            "prompt": "make it blue",
            "image": {"data": "iVBORw0KGgo=", "mimeType": "image/png"}
        }),
    )
    .await
    .unwrap();
    assert!(res["data"].is_string());
}

#[tokio::test]
async fn test_generate_without_input_reports_kind() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "image.generate", &json!({})).await.unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::MissingInput));

    let response = err.to_response(json!(7));
    assert_eq!(response["id"], 7);
    assert_eq!(response["kind"], "MissingInput");
    assert_eq!(response["error"], "Please provide a prompt or an image to start.");
}

#[tokio::test]
async fn test_generate_without_credential() {
    let (app, _tmp) = setup_with(CannedClient { fail_with: None }, None);
    let err = handle_method(&app, "image.generate", &json!({"prompt": "a banana"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::MissingCredential));
}

#[tokio::test]
async fn test_generate_with_rejected_key() {
    let client = CannedClient {
        fail_with: Some("INVALID_ARGUMENT: API key not valid. [API_KEY_INVALID]".to_string()),
    };
    let (app, _tmp) = setup_with(client, Some("bad"));
    let err = handle_method(&app, "image.generate", &json!({"prompt": "a banana"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::InvalidCredential));
}

#[tokio::test]
async fn test_generate_rejects_malformed_image_object() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "image.generate", &json!({"prompt": "x", "image": 42}))
        .await
        .unwrap_err();
    assert!(err.message.contains("invalid image payload"));
    assert_eq!(err.kind, None);
}

// ─── File input ───

#[tokio::test]
async fn test_load_file() {
    let (app, tmp) = setup();
    let path = tmp.path().join("in.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let res = handle_method(&app, "image.load_file", &json!({"path": path.to_str().unwrap()}))
        .await
        .unwrap();
    assert_eq!(res["mimeType"], "image/png");
    assert_eq!(res["data"], "iVBORw==");
}

#[tokio::test]
async fn test_load_file_rejects_unsupported_type() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "image.load_file", &json!({"path": "notes.txt"}))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Please upload a valid image file (PNG, JPG, etc.).");
}

#[tokio::test]
async fn test_from_data_url() {
    let (app, _tmp) = setup();
    let res = handle_method(
        &app,
        "image.from_data_url",
        &json!({"data_url": "data:image/webp;base64,UklGRg=="}),
    )
    .await
    .unwrap();
    assert_eq!(res, json!({"data": "UklGRg==", "mimeType": "image/webp"}));
}

// ─── Navigation ───

#[tokio::test]
async fn test_normalize_address() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "navigation.normalize", &json!({"input": " rust-lang.org "}))
        .await
        .unwrap();
    assert_eq!(res["url"], "https://rust-lang.org");

    let err = handle_method(&app, "navigation.normalize", &json!({"input": "   "}))
        .await
        .unwrap_err();
    assert_eq!(err.message, "empty address");
}

// ─── Settings ───

#[tokio::test]
async fn test_settings_get_set_reset() {
    let (app, _tmp) = setup();

    let settings = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(settings["model"], "gemini-2.5-flash-image");

    let res = handle_method(
        &app,
        "settings.set",
        &json!({"key": "home_url", "value": "https://example.com"}),
    )
    .await
    .unwrap();
    assert_eq!(res, json!({"ok": true}));

    let settings = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(settings["home_url"], "https://example.com");

    let settings = handle_method(&app, "settings.reset", &json!({})).await.unwrap();
    assert_eq!(settings["home_url"], "https://www.google.com");
}

#[tokio::test]
async fn test_settings_set_unknown_key() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "settings.set", &json!({"key": "theme", "value": "dark"}))
        .await
        .unwrap_err();
    assert!(err.message.contains("theme"));
}

#[tokio::test]
async fn test_missing_params() {
    let (app, _tmp) = setup();
    for method in ["image.load_file", "image.from_data_url", "navigation.normalize", "settings.set"] {
        let err = handle_method(&app, method, &json!({})).await.unwrap_err();
        assert!(err.message.starts_with("missing"), "{}: {}", method, err.message);
    }
}
