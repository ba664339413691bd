pub mod audio;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod transport;

// Re-export specific items if needed for convenient access
pub use controller::VoiceController;
pub use error::VoiceError;
