//! Banana Studio UI layer.
//!
//! Uses `wry` for WebView rendering and `tao` for windows:
//! - the studio window renders the prompt panel and the output image;
//! - the browser window hosts an embedded web view that is mirrored into a
//!   `NavigationSync` through the `BrowserSurface` adapter.
//!
//! Communication between the pages and Rust uses wry IPC.

pub mod browser_surface;
pub mod webview_app;
