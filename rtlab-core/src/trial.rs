use std::fmt;

use serde::{Deserialize, Serialize};

use crate::paradigm::{Paradigm, StimulusKind};
use crate::response::Response;
use crate::stimulus::Stimulus;

/// Opaque identity of the subject a run belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a trial ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TrialOutcome {
    Responded { at_ns: u64, response: Response },
    TimedOut,
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub index: usize,
    pub stimulus: Stimulus,
    pub presented_at_ns: u64,
    pub outcome: TrialOutcome,
    pub latency_ms: f64,
    pub is_correct: bool,
}

impl Trial {
    pub fn timed_out(&self) -> bool {
        matches!(self.outcome, TrialOutcome::TimedOut)
    }

    /// Correct and answered before the timeout.
    pub fn is_valid(&self) -> bool {
        self.is_correct && !self.timed_out()
    }
}

/// Trial counts come from configuration; reserve no more than this up front.
const MAX_PREALLOCATED_TRIALS: usize = 256;

/// An ordered sequence of trials under one paradigm, kind and subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub paradigm: Paradigm,
    pub stimulus_kind: StimulusKind,
    pub total_trials: usize,
    pub subject: SubjectId,
    pub session: u64,
    pub trials: Vec<Trial>,
}

impl Run {
    pub fn new(
        paradigm: Paradigm,
        stimulus_kind: StimulusKind,
        total_trials: usize,
        subject: SubjectId,
        session: u64,
    ) -> Self {
        Self {
            paradigm,
            stimulus_kind,
            total_trials,
            subject,
            session,
            trials: Vec::with_capacity(total_trials.min(MAX_PREALLOCATED_TRIALS)),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.trials.len() == self.total_trials
    }

    pub fn context(&self) -> RunContext {
        RunContext {
            subject: self.subject.clone(),
            session: self.session,
            paradigm: self.paradigm,
            stimulus_kind: self.stimulus_kind,
            total_trials: self.total_trials,
        }
    }
}

/// Keys a ledger record to its subject and session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub subject: SubjectId,
    pub session: u64,
    pub paradigm: Paradigm,
    pub stimulus_kind: StimulusKind,
    pub total_trials: usize,
}
