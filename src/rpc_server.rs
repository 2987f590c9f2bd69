//! Banana Studio RPC Server — JSON-RPC over stdin/stdout for Electron integration.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"image.generate", "params":{"prompt":"...","image":{...}}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"...", "kind":"..."}
//!
//! Requests are handled one at a time. Logs go to stderr.

use std::sync::Mutex;

use banana_studio::app::App;
use banana_studio::rpc_handler::handle_method;
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

async fn write_line(stdout: &mut io::Stdout, value: &Value) -> std::io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var("BANANA_STUDIO_CONFIG").ok();
    let app = Mutex::new(App::new(config_path)?);

    let mut stdout = io::stdout();
    write_line(&mut stdout, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                write_line(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));
        tracing::debug!(%method, "rpc request");

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => err.to_response(id),
        };
        write_line(&mut stdout, &response).await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
