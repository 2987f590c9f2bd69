//! Banana Studio — a minimal desktop studio for generating and editing images with Gemini.
//!
//! Entry point: opens the studio and browser windows when built with the
//! `gui` feature. Without it, runs a console mode:
//!
//! ```text
//! banana-studio <prompt> [input-image] [--out <file>]
//! ```

use banana_studio::app::App;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[cfg(feature = "gui")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let app = App::new(None)?;
    banana_studio::ui::webview_app::run(app)
}

#[cfg(not(feature = "gui"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::path::PathBuf;

    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use banana_studio::services::image_input::load_image_file;

    init_tracing();

    let mut prompt = String::new();
    let mut image_path: Option<PathBuf> = None;
    let mut out = PathBuf::from("generated.png");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--out" {
            out = args.next().map(PathBuf::from).ok_or("--out needs a file name")?;
        } else if prompt.is_empty() {
            prompt = arg;
        } else if image_path.is_none() {
            image_path = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument: {}", arg).into());
        }
    }

    let image = match image_path.as_deref() {
        Some(path) => Some(load_image_file(path)?),
        None => None,
    };

    let app = App::new(None)?;
    println!("Generating with {}...", app.generator.client().model());
    let data = app.generator.generate(&prompt, image).await?;
    let bytes = BASE64.decode(data.as_bytes())?;
    std::fs::write(&out, bytes)?;
    println!("Saved {}", out.display());
    Ok(())
}
