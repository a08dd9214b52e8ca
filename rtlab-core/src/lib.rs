pub mod error;
pub mod paradigm;
pub mod response;
pub mod state;
pub mod stats;
pub mod stimulus;
pub mod trial;

pub use error::{ExperimentError, LedgerError, Result};
pub use paradigm::{Paradigm, StimulusKind};
pub use response::{Response, Selection};
pub use state::EngineState;
pub use stats::{summarize, RunStatistics};
pub use stimulus::{
    ArrowDirection, Axis, ChoiceOption, ChoiceStimulus, Color, Descriptor, DisjunctiveStimulus,
    Shape, SimpleStimulus, SimpleVisual, Stimulus, Symbol, INSTRUCTIONS,
};
pub use trial::{Run, RunContext, SubjectId, Trial, TrialOutcome};
