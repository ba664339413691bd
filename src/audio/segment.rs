use std::io::Cursor;

use crate::error::VoiceError;

pub const WAV_MEDIA_TYPE: &str = "audio/wav";

/// One finalized, immutable recording, encoded and ready for transport.
/// Produced exactly once per recording session.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    bytes: Vec<u8>,
    media_type: &'static str,
    sample_rate: u32,
    sample_count: usize,
}

impl AudioSegment {
    /// Encode ordered mono samples into a 16-bit PCM WAV payload.
    pub fn from_samples(samples: &[f32], sample_rate: u32) -> Result<Self, VoiceError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| VoiceError::Validation(format!("wav encode failed: {e}")))?;
        for &sample in samples {
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(scaled)
                .map_err(|e| VoiceError::Validation(format!("wav encode failed: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| VoiceError::Validation(format!("wav encode failed: {e}")))?;

        Ok(Self {
            bytes: cursor.into_inner(),
            media_type: WAV_MEDIA_TYPE,
            sample_rate,
            sample_count: samples.len(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        self.media_type
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Empty means no audio content; the WAV header alone does not count.
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

/// Decodable audio bytes the output sink can render. This is all the rest
/// of the system ever sees of the reply audio.
#[derive(Debug, Clone)]
pub struct PlayableAudio {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl PlayableAudio {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
