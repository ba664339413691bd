use std::io::Cursor;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use crate::audio::segment::PlayableAudio;
use crate::error::VoiceError;

/// The single audio-output resource. The controller owns one sink; the
/// rest of the system only ever asks it to play a handle.
pub trait AudioSink {
    /// Begin playing `audio`. Whatever was playing before must already be
    /// stopped by the caller; no two handles render at once.
    fn play(&mut self, audio: PlayableAudio) -> Result<(), VoiceError>;

    /// Stop and discard the current playback, if any.
    fn stop(&mut self);
}

/// Real speaker output via rodio. The output stream is opened lazily on
/// first play so constructing the sink never touches hardware.
pub struct SpeakerSink {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl SpeakerSink {
    pub fn new() -> Self {
        Self {
            output: None,
            sink: None,
        }
    }
}

impl Default for SpeakerSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for SpeakerSink {
    fn play(&mut self, audio: PlayableAudio) -> Result<(), VoiceError> {
        self.stop();

        if self.output.is_none() {
            let pair = OutputStream::try_default()
                .map_err(|e| VoiceError::Playback(format!("no audio output device: {e}")))?;
            self.output = Some(pair);
        }
        let handle = match &self.output {
            Some((_, handle)) => handle,
            None => return Err(VoiceError::Playback("output stream unavailable".into())),
        };

        debug!(
            "Playing {} byte reply ({})",
            audio.bytes.len(),
            audio.media_type
        );

        let source = Decoder::new(Cursor::new(audio.bytes))
            .map_err(|e| VoiceError::Playback(format!("undecodable reply audio: {e}")))?;
        let sink = Sink::try_new(handle)
            .map_err(|e| VoiceError::Playback(format!("cannot open playback sink: {e}")))?;
        sink.append(source);

        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
