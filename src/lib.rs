//! Banana Studio — a minimal desktop studio for generating and editing images with Gemini.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
