use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart;
use serde::Deserialize;
use tracing::{debug, info};

use crate::audio::segment::{AudioSegment, PlayableAudio};
use crate::config::BackendConfig;
use crate::error::VoiceError;

// Wire contract with the backend: one multipart field on the way up,
// three response headers alongside the synthesized audio on the way down.
const AUDIO_FIELD: &str = "audio";
const UPLOAD_FILE_NAME: &str = "recording.wav";
const TRANSCRIBED_TEXT_HEADER: &str = "x-transcribed-text";
const RESPONSE_TEXT_HEADER: &str = "x-response-text";
const HOSPITALS_FOUND_HEADER: &str = "x-hospitals-found";

/// The outcome of one voice round trip. Handed to the caller whole; the
/// client retains nothing.
#[derive(Debug, Clone)]
pub struct VoiceExchangeResult {
    /// Empty string when the backend could not transcribe.
    pub transcribed_text: String,
    pub response_text: String,
    pub hospitals_found: u32,
    pub audio: PlayableAudio,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub hospitals_indexed: u64,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Executes the wire contract for voice exchanges; isolates the controller
/// from transport details.
#[derive(Clone)]
pub struct VoiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl VoiceClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.clone(),
        }
    }

    /// Upload one finalized segment and decode the reply. Never retries:
    /// retry is the user pressing the mic again.
    pub async fn exchange_voice(
        &self,
        segment: &AudioSegment,
    ) -> Result<VoiceExchangeResult, VoiceError> {
        if segment.is_empty() {
            return Err(VoiceError::Validation(
                "recorded segment contains no audio".into(),
            ));
        }

        let part = multipart::Part::bytes(segment.bytes().to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(segment.media_type())
            .map_err(|e| VoiceError::Validation(format!("bad media type: {e}")))?;
        let form = multipart::Form::new().part(AUDIO_FIELD, part);

        debug!(
            "Uploading {} byte segment to {}/voice",
            segment.byte_len(),
            self.base_url
        );

        let response = self
            .client
            .post(format!("{}/voice", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceError::Transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VoiceError::Transport(format!(
                "backend returned {}",
                response.status()
            )));
        }

        let transcribed_text = header_text(response.headers(), TRANSCRIBED_TEXT_HEADER);
        let response_text = header_text(response.headers(), RESPONSE_TEXT_HEADER);
        let hospitals_found = response
            .headers()
            .get(HOSPITALS_FOUND_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0);
        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| VoiceError::Transport(format!("response body unreadable: {e}")))?;

        info!(
            "Exchange complete: {} hospitals found, {} byte reply",
            hospitals_found,
            body.len()
        );

        Ok(VoiceExchangeResult {
            transcribed_text,
            response_text,
            hospitals_found,
            audio: PlayableAudio::new(body.to_vec(), media_type),
        })
    }

    /// One-shot health probe for the startup badge. Failure degrades to a
    /// "starting/unavailable" display, never blocks the interface.
    pub async fn check_health(&self) -> Result<HealthStatus, VoiceError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| VoiceError::Transport(format!("health check failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VoiceError::Transport(format!(
                "backend returned {}",
                response.status()
            )));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| VoiceError::Transport(format!("malformed health payload: {e}")))
    }
}

/// Missing or unreadable text headers decode as the empty string.
fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}
