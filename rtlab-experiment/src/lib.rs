pub mod catalog;
pub mod config;
pub mod events;
pub mod ledger;
pub mod state;
pub mod trial;
pub use catalog::StimulusCatalog;
pub use config::{ExperimentConfig, RunSpec};
pub use events::{ClockEvent, EngineEvent, ResponseOutcome};
pub use ledger::{JsonLinesLedger, MemoryLedger, RunLedger};
pub use state::TrialStateMachine;
pub use trial::{judge, PendingTrial};
