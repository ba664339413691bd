mod client;

pub use client::{HealthStatus, VoiceClient, VoiceExchangeResult};
