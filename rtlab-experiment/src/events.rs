use rtlab_core::{Paradigm, RunStatistics, Stimulus, StimulusKind, Trial};
use serde::Serialize;

/// Events emitted to the rendering/UI side, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    RunStarted {
        paradigm: Paradigm,
        stimulus_kind: StimulusKind,
        total_trials: usize,
    },
    StimulusShown(Stimulus),
    TrialRecorded(Trial),
    RunCompleted(RunStatistics),
    ResponseTimeout { index: usize },
    /// The ledger rejected a write. The run carries on.
    PersistenceFailed { message: String },
}

/// Items the engine schedules on its clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    ArmedDelayElapsed,
    ResponseTimeout,
}

/// Result of delivering a response to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// No stimulus was on screen; nothing changed.
    Ignored,
    Recorded {
        trial: Trial,
        events: Vec<EngineEvent>,
    },
}

impl ResponseOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, ResponseOutcome::Ignored)
    }

    pub fn events(&self) -> &[EngineEvent] {
        match self {
            ResponseOutcome::Ignored => &[],
            ResponseOutcome::Recorded { events, .. } => events,
        }
    }
}
