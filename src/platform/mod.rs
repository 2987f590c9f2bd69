// Banana Studio platform paths
//
// Uses `cfg(target_os)` to pick the platform convention at compile time.

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Banana Studio.
///
/// - **Linux**: `$XDG_CONFIG_HOME/banana-studio` or `~/.config/banana-studio`
/// - **macOS**: `~/Library/Application Support/banana-studio`
/// - **Windows**: `%APPDATA%\banana-studio`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Temp"));
        PathBuf::from(appdata).join("banana-studio")
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from(home_dir())
            .join("Library")
            .join("Application Support")
            .join("banana-studio")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("banana-studio"),
            _ => PathBuf::from(home_dir()).join(".config").join("banana-studio"),
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> String {
    env::var("HOME").unwrap_or_else(|_| String::from("/tmp"))
}
