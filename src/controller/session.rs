use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};
use uuid::Uuid;

use crate::audio::capture::{CaptureHandle, CaptureSource};
use crate::audio::monitor::{CaptureSignal, SilenceMonitor};
use crate::audio::segment::AudioSegment;
use crate::error::VoiceError;

// Process-wide capture slot. Holding the device is exclusive even if
// several controllers get constructed in the same process.
static CAPTURE_SLOT: AtomicBool = AtomicBool::new(false);

/// One capture attempt. Owns the device handle exclusively, accumulates
/// chunks in delivery order, and finalizes into a single immutable
/// segment. Finalization consumes the session, so it happens exactly once.
pub struct RecordingSession {
    pub id: Uuid,
    handle: CaptureHandle,
    samples: Vec<f32>,
    monitor: SilenceMonitor,
}

impl RecordingSession {
    /// Claim the capture slot, then acquire the device. The slot is taken
    /// first so a losing caller never opens a second device handle.
    pub fn begin(source: &mut dyn CaptureSource) -> Result<Self, VoiceError> {
        if CAPTURE_SLOT
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(VoiceError::Device(
                "another recording session is active".into(),
            ));
        }

        let handle = match source.open() {
            Ok(handle) => handle,
            Err(err) => {
                CAPTURE_SLOT.store(false, Ordering::Release);
                return Err(err);
            }
        };

        let id = Uuid::new_v4();
        info!("Recording session {} started at {}Hz", id, handle.sample_rate);

        Ok(Self {
            id,
            monitor: SilenceMonitor::new(handle.sample_rate),
            handle,
            samples: Vec::new(),
        })
    }

    /// Drain chunks delivered since the last poll, preserving delivery
    /// order. Returns `AutoStop` when the silence monitor wants the
    /// capture finalized.
    pub fn drain(&mut self) -> Option<CaptureSignal> {
        let mut stop = None;
        loop {
            match self.handle.chunks.try_recv() {
                Ok(chunk) => {
                    match self.monitor.process(&chunk) {
                        Some(CaptureSignal::SpeechStart) => {
                            debug!("Speech detected in session {}", self.id);
                        }
                        Some(CaptureSignal::AutoStop) => stop = Some(CaptureSignal::AutoStop),
                        None => {}
                    }
                    self.samples.extend_from_slice(&chunk);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        stop
    }

    /// Release the device, then encode the accumulated samples. The
    /// hardware track stops before any encoding or network work begins.
    pub fn finalize(mut self) -> Result<AudioSegment, VoiceError> {
        self.handle.release();
        // The callback can no longer produce; whatever is still queued in
        // the channel belongs to the recording.
        self.drain();

        let segment = AudioSegment::from_samples(&self.samples, self.handle.sample_rate)?;
        info!(
            "Session {} finalized: {} samples, {} bytes",
            self.id,
            self.samples.len(),
            segment.byte_len()
        );
        Ok(segment)
    }
}

impl Drop for RecordingSession {
    // Covers abrupt teardown too: the device is released and the slot
    // freed on every path out of a recording.
    fn drop(&mut self) {
        self.handle.release();
        CAPTURE_SLOT.store(false, Ordering::Release);
    }
}
