/// Signals derived from the live capture feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSignal {
    SpeechStart,
    /// The capture should be finalized: sustained silence after speech,
    /// or the hard duration cap was hit.
    AutoStop,
}

/// Simple energy-based watcher over delivered chunks. Arms after speech is
/// detected and requests an automatic stop once the speaker has gone quiet.
/// Pure signal analysis, no I/O.
pub struct SilenceMonitor {
    sample_rate: u32,
    threshold_rms: f32,
    min_speech_ms: u64,
    min_silence_ms: u64,
    max_capture_ms: u64,

    // State
    in_speech: bool,
    speech_seen: bool,
    consecutive_speech_ms: u64,
    consecutive_silence_ms: u64,
    elapsed_ms: u64,
    done: bool,
}

impl SilenceMonitor {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            threshold_rms: 0.03,      // ignore room noise and mic hiss
            min_speech_ms: 120,       // ignore short pops
            min_silence_ms: 1_500,    // pause length that ends a question
            max_capture_ms: 30_000,   // hard cap per capture
            in_speech: false,
            speech_seen: false,
            consecutive_speech_ms: 0,
            consecutive_silence_ms: 0,
            elapsed_ms: 0,
            done: false,
        }
    }

    /// Process one chunk of raw samples. Returns Some when a transition
    /// occurs. After `AutoStop` the monitor stays quiet for good.
    pub fn process(&mut self, samples: &[f32]) -> Option<CaptureSignal> {
        if samples.is_empty() || self.done {
            return None;
        }

        let sq_sum: f32 = samples.iter().map(|&x| x * x).sum();
        let rms = (sq_sum / samples.len() as f32).sqrt();

        let chunk_ms = (samples.len() as u64 * 1000) / self.sample_rate as u64;
        self.elapsed_ms += chunk_ms;

        if self.elapsed_ms >= self.max_capture_ms {
            self.done = true;
            return Some(CaptureSignal::AutoStop);
        }

        if rms > self.threshold_rms {
            self.consecutive_speech_ms += chunk_ms;
            self.consecutive_silence_ms = 0;

            if !self.in_speech && self.consecutive_speech_ms >= self.min_speech_ms {
                self.in_speech = true;
                self.speech_seen = true;
                return Some(CaptureSignal::SpeechStart);
            }
        } else {
            self.consecutive_silence_ms += chunk_ms;
            self.consecutive_speech_ms = 0;

            // Silence before any speech never stops the capture; the user
            // may just be thinking.
            if self.speech_seen && self.consecutive_silence_ms >= self.min_silence_ms {
                self.done = true;
                return Some(CaptureSignal::AutoStop);
            }
        }

        None
    }
}
