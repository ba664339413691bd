use std::time::Duration;
use tracing::info;

const API_URL_ENV: &str = "LOOPVOICE_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:8000";

// STT + retrieval + TTS on the backend side can take a while; the exchange
// timeout has to cover the whole turn, not a single hop.
const EXCHANGE_TIMEOUT_SECS: u64 = 60;

/// Where the voice backend lives. Resolved once at startup; the base
/// address is the only knob that comes from the environment.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let config = Self::with_base_url(base_url);
        info!("Backend endpoint: {}", config.base_url);
        config
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(EXCHANGE_TIMEOUT_SECS),
        }
    }
}
