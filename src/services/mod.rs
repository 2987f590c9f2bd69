// Banana Studio services
// Services talk to the outside world: the model API, the file system and the settings file.

pub mod gemini_client;
pub mod image_generator;
pub mod image_input;
pub mod settings_engine;
