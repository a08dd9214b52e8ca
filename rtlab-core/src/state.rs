use serde::{Deserialize, Serialize};

/// Lifecycle states of the trial engine
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Idle,
    /// Waiting out the randomized delay before the next stimulus.
    Armed,
    /// Stimulus on screen, response window open.
    StimulusShown,
    Scored,
    TimedOut,
    Completed,
}

impl EngineState {
    pub fn accepts_response(&self) -> bool {
        matches!(self, Self::StimulusShown)
    }

    /// A run is in progress and `start` must be refused.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Armed | Self::StimulusShown | Self::Scored | Self::TimedOut
        )
    }

    /// Successor after a trial has been recorded.
    pub fn after_recording(&self, last_trial: bool) -> Option<Self> {
        match self {
            Self::Scored | Self::TimedOut if last_trial => Some(Self::Completed),
            Self::Scored | Self::TimedOut => Some(Self::Armed),
            _ => None,
        }
    }
}
