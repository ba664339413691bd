/// Interface phase. Exactly one is active at any time; the enum makes an
/// overlapping combination unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recording,
    Processing,
}

/// Strict state delta. This is the ONLY way interface state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    CaptureStarted,
    CaptureStopped,
    ExchangeCompleted,
    ExchangeFailed(String),
    DeviceFailed(String),
    PlaybackFailed(String),
}

/// Process-visible UI state: current phase plus the last surfaced error.
#[derive(Debug, Clone)]
pub struct InterfaceState {
    phase: Phase,
    last_error: Option<String>,
    // Monotonic version, bumped on every reduction
    pub version: u64,
}

impl Default for InterfaceState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            last_error: None,
            version: 0,
        }
    }
}

impl InterfaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Pure reduction: State + Delta -> Mutated State.
    ///
    /// Phase transitions only apply from their legal source phase; a delta
    /// arriving in any other phase leaves the phase untouched. That is
    /// what makes out-of-order gestures total no-ops.
    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;

        match delta {
            StateDelta::CaptureStarted => {
                if self.phase == Phase::Idle {
                    self.phase = Phase::Recording;
                    self.last_error = None;
                }
            }
            StateDelta::CaptureStopped => {
                if self.phase == Phase::Recording {
                    self.phase = Phase::Processing;
                }
            }
            StateDelta::ExchangeCompleted => {
                if self.phase == Phase::Processing {
                    self.phase = Phase::Idle;
                }
            }
            StateDelta::ExchangeFailed(message) => {
                if self.phase == Phase::Processing {
                    self.phase = Phase::Idle;
                }
                self.last_error = Some(message);
            }
            StateDelta::DeviceFailed(message) => {
                // Acquisition failed, so we never left idle.
                self.last_error = Some(message);
            }
            StateDelta::PlaybackFailed(message) => {
                // The exchange already completed; only the error surfaces.
                self.last_error = Some(message);
            }
        }
    }
}
