use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::VoiceError;

/// Fixed capture constraints. Mono 16kHz keeps uploads small and matches
/// what the backend transcriber expects.
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;
pub const CAPTURE_CHANNELS: u16 = 1;

/// One batch of samples as delivered by the device callback.
pub type AudioChunk = Vec<f32>;

/// Keeps the platform stream alive. Dropping the guard stops the
/// underlying hardware track.
pub trait StreamGuard {}

/// An acquired capture device: ordered chunk delivery plus the guard that
/// owns the hardware stream.
pub struct CaptureHandle {
    pub sample_rate: u32,
    pub chunks: mpsc::UnboundedReceiver<AudioChunk>,
    guard: Option<Box<dyn StreamGuard>>,
}

impl CaptureHandle {
    pub fn new(
        sample_rate: u32,
        chunks: mpsc::UnboundedReceiver<AudioChunk>,
        guard: Box<dyn StreamGuard>,
    ) -> Self {
        Self {
            sample_rate,
            chunks,
            guard: Some(guard),
        }
    }

    /// Stop the hardware track. Chunks already delivered stay readable.
    pub fn release(&mut self) {
        self.guard.take();
    }

    pub fn is_released(&self) -> bool {
        self.guard.is_none()
    }
}

/// Seam between the recording session and the physical microphone, so
/// tests can script chunk delivery without hardware.
pub trait CaptureSource {
    fn open(&mut self) -> Result<CaptureHandle, VoiceError>;
}

/// The real microphone, via cpal.
pub struct MicSource;

struct MicStream {
    _stream: cpal::Stream,
}

impl StreamGuard for MicStream {}

impl CaptureSource for MicSource {
    fn open(&mut self) -> Result<CaptureHandle, VoiceError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| VoiceError::Device("no input device available".into()))?;

        info!("Audio input device: {}", device.name().unwrap_or_default());

        // We require the fixed constraints rather than resampling: if the
        // device cannot do mono 16kHz the acquisition fails and the
        // interface stays idle.
        let ranges = device
            .supported_input_configs()
            .map_err(|e| VoiceError::Device(format!("cannot query input configs: {e}")))?;

        let mut selected = None;
        for range in ranges {
            if range.channels() == CAPTURE_CHANNELS
                && range.min_sample_rate().0 <= CAPTURE_SAMPLE_RATE
                && range.max_sample_rate().0 >= CAPTURE_SAMPLE_RATE
            {
                selected = Some(range.with_sample_rate(cpal::SampleRate(CAPTURE_SAMPLE_RATE)));
                break;
            }
        }
        let config = selected.ok_or_else(|| {
            VoiceError::Device(format!(
                "input device does not support {}ch {}Hz capture",
                CAPTURE_CHANNELS, CAPTURE_SAMPLE_RATE
            ))
        })?;

        info!(
            "Capture config selected: rate={}Hz, format={:?}",
            CAPTURE_SAMPLE_RATE,
            config.sample_format()
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let err_fn = |err| error!("capture stream error: {}", err);

        // Send failures mean the session side hung up; the callback just
        // drops the chunk.
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let tx = tx.clone();
                device.build_input_stream(
                    &config.into(),
                    move |data: &[f32], _: &_| {
                        let _ = tx.send(data.to_vec());
                    },
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let tx = tx.clone();
                device.build_input_stream(
                    &config.into(),
                    move |data: &[i16], _: &_| {
                        let chunk = data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                        let _ = tx.send(chunk);
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                return Err(VoiceError::Device(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        }
        .map_err(|e| VoiceError::Device(format!("cannot open capture stream: {e}")))?;

        stream
            .play()
            .map_err(|e| VoiceError::Device(format!("cannot start capture stream: {e}")))?;

        Ok(CaptureHandle::new(
            CAPTURE_SAMPLE_RATE,
            rx,
            Box::new(MicStream { _stream: stream }),
        ))
    }
}
