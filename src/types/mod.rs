// Banana Studio shared type definitions
// Each submodule defines types used across the application.

pub mod errors;
pub mod gemini;
pub mod image;
pub mod navigation;
pub mod settings;
