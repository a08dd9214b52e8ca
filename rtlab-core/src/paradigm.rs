use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;

/// Response-judgment rule family of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paradigm {
    /// Any response to the single stimulus counts.
    Simple,
    /// Pick the target among four labeled options.
    Choice,
    /// Pick the target among distractors.
    Disjunctive,
}

impl Paradigm {
    pub const ALL: [Paradigm; 3] = [Paradigm::Simple, Paradigm::Choice, Paradigm::Disjunctive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Paradigm::Simple => "simple",
            Paradigm::Choice => "choice",
            Paradigm::Disjunctive => "disjunctive",
        }
    }

    /// Whether the stimulus kind of the run shapes the generated content.
    pub fn uses_stimulus_kind(&self) -> bool {
        matches!(self, Paradigm::Simple)
    }
}

impl fmt::Display for Paradigm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Paradigm {
    type Err = ExperimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Paradigm::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExperimentError::InvalidConfiguration(format!("unknown paradigm `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusKind {
    Color,
    Shape,
    Symbol,
    Text,
}

impl StimulusKind {
    pub const ALL: [StimulusKind; 4] = [
        StimulusKind::Color,
        StimulusKind::Shape,
        StimulusKind::Symbol,
        StimulusKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StimulusKind::Color => "color",
            StimulusKind::Shape => "shape",
            StimulusKind::Symbol => "symbol",
            StimulusKind::Text => "text",
        }
    }
}

impl fmt::Display for StimulusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StimulusKind {
    type Err = ExperimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StimulusKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ExperimentError::InvalidConfiguration(format!("unknown stimulus kind `{s}`"))
            })
    }
}
