mod session;
mod state;

pub use session::RecordingSession;
pub use state::{InterfaceState, Phase, StateDelta};

use tracing::{debug, warn};

use crate::audio::capture::CaptureSource;
use crate::audio::monitor::CaptureSignal;
use crate::audio::playback::AudioSink;
use crate::conversation::{ConversationEntry, ConversationLog};
use crate::transport::VoiceClient;

/// Mediates between user gestures and the capture/playback hardware.
///
/// All four error kinds are caught here and reduced into interface state;
/// nothing escapes to the driver, and every failure leaves the interface
/// idle and usable for another attempt.
pub struct VoiceController {
    state: InterfaceState,
    conversation: ConversationLog,
    client: VoiceClient,
    source: Box<dyn CaptureSource>,
    sink: Box<dyn AudioSink>,
    session: Option<RecordingSession>,
}

impl VoiceController {
    pub fn new(
        client: VoiceClient,
        source: Box<dyn CaptureSource>,
        sink: Box<dyn AudioSink>,
    ) -> Self {
        Self {
            state: InterfaceState::new(),
            conversation: ConversationLog::new(),
            client,
            source,
            sink,
            session: None,
        }
    }

    pub fn state(&self) -> &InterfaceState {
        &self.state
    }

    pub fn conversation(&self) -> &[ConversationEntry] {
        self.conversation.entries()
    }

    /// Start gesture. Only acts from `idle`; in any other phase it is a
    /// no-op and never touches the device.
    pub fn start_capture(&mut self) {
        if self.state.phase() != Phase::Idle {
            debug!("Ignoring start gesture in {:?}", self.state.phase());
            return;
        }

        match RecordingSession::begin(self.source.as_mut()) {
            Ok(session) => {
                self.session = Some(session);
                self.state.reduce(StateDelta::CaptureStarted);
            }
            Err(err) => {
                warn!("Capture unavailable: {}", err);
                self.state.reduce(StateDelta::DeviceFailed(err.to_string()));
            }
        }
    }

    /// Cadence hook for the driver: drains delivered chunks into the
    /// session and reports whether the silence monitor requested an
    /// automatic stop. Quiet outside `recording`.
    pub fn poll_capture(&mut self) -> bool {
        if self.state.phase() != Phase::Recording {
            return false;
        }
        match self.session.as_mut() {
            Some(session) => matches!(session.drain(), Some(CaptureSignal::AutoStop)),
            None => false,
        }
    }

    /// Stop gesture: finalize the session, run the exchange, append the
    /// two transcript entries, hand the reply to playback. No-op outside
    /// `recording`.
    pub async fn stop_capture(&mut self) {
        if self.state.phase() != Phase::Recording {
            debug!("Ignoring stop gesture in {:?}", self.state.phase());
            return;
        }
        let Some(session) = self.session.take() else {
            // Unreachable through the public API; recover to idle anyway.
            self.state.reduce(StateDelta::CaptureStopped);
            self.state
                .reduce(StateDelta::ExchangeFailed("no active session".into()));
            return;
        };

        // Device release happens inside finalize, before the upload, so
        // the mic indicator turns off as soon as capture ends.
        self.state.reduce(StateDelta::CaptureStopped);
        let segment = match session.finalize() {
            Ok(segment) => segment,
            Err(err) => {
                warn!("Finalize failed: {}", err);
                self.state.reduce(StateDelta::ExchangeFailed(err.to_string()));
                return;
            }
        };

        match self.client.exchange_voice(&segment).await {
            Ok(result) => {
                self.conversation
                    .append_exchange(&result.transcribed_text, &result.response_text);
                self.state.reduce(StateDelta::ExchangeCompleted);

                // A new reply always supersedes whatever is still playing.
                self.sink.stop();
                if let Err(err) = self.sink.play(result.audio) {
                    warn!("Reply playback failed: {}", err);
                    self.state.reduce(StateDelta::PlaybackFailed(err.to_string()));
                }
            }
            Err(err) => {
                warn!("Voice exchange failed: {}", err);
                self.state.reduce(StateDelta::ExchangeFailed(err.to_string()));
            }
        }
    }
}

impl Drop for VoiceController {
    fn drop(&mut self) {
        // Session drop releases the device and frees the capture slot;
        // the sink just needs to go quiet.
        self.sink.stop();
    }
}
