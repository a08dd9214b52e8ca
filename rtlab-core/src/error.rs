use thiserror::Error;

/// Errors raised by the experiment engine and its collaborators
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("a run is already active; stop it before starting another")]
    AlreadyRunning,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("persistence write failed: {0}")]
    PersistenceWrite(#[from] LedgerError),

    /// A transition found the engine in an inconsistent state. The engine
    /// resets to idle when this is raised.
    #[error("internal engine fault: {0}")]
    Internal(String),
}

/// Failure of a run ledger write
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
