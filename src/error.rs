use thiserror::Error;

/// Failure taxonomy for the voice round trip.
///
/// Every variant is recoverable: the controller absorbs it into
/// `InterfaceState::last_error` and the interface stays usable for
/// another attempt. Nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Capture device could not be acquired (permission, hardware,
    /// constraint mismatch) or a second session tried to claim it.
    #[error("microphone unavailable: {0}")]
    Device(String),

    /// Segment rejected before any network activity.
    #[error("invalid recording: {0}")]
    Validation(String),

    /// Network failure, non-success backend status, or malformed response.
    #[error("voice exchange failed: {0}")]
    Transport(String),

    /// Synthesized reply could not be decoded or rendered. The exchange
    /// itself already completed when this fires.
    #[error("playback failed: {0}")]
    Playback(String),
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        VoiceError::Transport(err.to_string())
    }
}
