//! RPC method handler for the Banana Studio JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested with a mock
//! model client. `handle_method` dispatches one call to the generator,
//! the file input boundary, address normalization or the settings engine.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::navigation_sync::normalize_address;
use crate::services::gemini_client::GenerativeModelClient;
use crate::services::image_input::{load_image_file, parse_data_url};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::errors::ErrorKind;
use crate::types::image::ImagePayload;

/// Error half of an RPC response.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub message: String,
    pub kind: Option<ErrorKind>,
}

impl RpcError {
    /// `{"id", "error", "kind"?}` response line.
    pub fn to_response(&self, id: Value) -> Value {
        match self.kind {
            Some(kind) => json!({"id": id, "error": self.message, "kind": kind}),
            None => json!({"id": id, "error": self.message}),
        }
    }
}

impl From<String> for RpcError {
    fn from(message: String) -> Self {
        Self { message, kind: None }
    }
}

impl From<&str> for RpcError {
    fn from(message: &str) -> Self {
        Self::from(message.to_string())
    }
}

/// Dispatch a JSON-RPC method call.
pub async fn handle_method<C: GenerativeModelClient>(
    app: &Mutex<App<C>>,
    method: &str,
    params: &Value,
) -> Result<Value, RpcError> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Generation ───
        "image.generate" => {
            let prompt = params.get("prompt").and_then(|v| v.as_str()).unwrap_or("");
            let image = match params.get("image") {
                None | Some(Value::Null) => None,
                Some(v) => Some(
                    serde_json::from_value::<ImagePayload>(v.clone())
                        .map_err(|e| format!("invalid image payload: {}", e))?,
                ),
            };
            let generator = {
                let a = app.lock().map_err(|e| e.to_string())?;
                Arc::clone(&a.generator)
            };
            let data = generator.generate(prompt, image).await.map_err(|e| RpcError {
                message: e.to_string(),
                kind: Some(e.kind()),
            })?;
            let data_url = format!("data:image/png;base64,{}", data);
            Ok(json!({"data": data, "dataUrl": data_url}))
        }

        // ─── File input ───
        "image.load_file" => {
            let path = params.get("path").and_then(|v| v.as_str()).ok_or("missing path")?;
            let payload = load_image_file(Path::new(path)).map_err(|e| e.to_string())?;
            Ok(json!(payload))
        }
        "image.from_data_url" => {
            let data_url = params
                .get("data_url")
                .and_then(|v| v.as_str())
                .ok_or("missing data_url")?;
            let payload = parse_data_url(data_url).map_err(|e| e.to_string())?;
            Ok(json!(payload))
        }

        // ─── Navigation ───
        "navigation.normalize" => {
            let input = params.get("input").and_then(|v| v.as_str()).ok_or("missing input")?;
            let url = normalize_address(input).ok_or("empty address")?;
            Ok(json!({"url": url}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!(a.settings_engine.get_settings()))
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            Ok(json!(a.settings_engine.get_settings()))
        }

        _ => Err(format!("unknown method: {}", method).into()),
    }
}
