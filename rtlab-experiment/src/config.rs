use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use rtlab_core::{ExperimentError, Paradigm, Result, StimulusKind, SubjectId};
use serde::{Deserialize, Serialize};

/// Timing parameters shared by every run of an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Half-open range the pre-stimulus delay is drawn from.
    pub armed_delay_ms: (u64, u64),
    pub response_timeout_ms: u64,
    pub default_trials: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            armed_delay_ms: (1000, 3000),
            response_timeout_ms: 3000,
            default_trials: 10,
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ExperimentError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ExperimentError::InvalidConfiguration(format!("{}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.armed_delay_ms;
        if lo >= hi {
            return Err(ExperimentError::InvalidConfiguration(format!(
                "armed delay range [{lo}, {hi}) is empty"
            )));
        }
        if self.response_timeout_ms == 0 {
            return Err(ExperimentError::InvalidConfiguration(
                "response timeout must be positive".into(),
            ));
        }
        if self.default_trials == 0 {
            return Err(ExperimentError::InvalidConfiguration(
                "default trial count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn armed_delay_range(&self) -> Range<u64> {
        self.armed_delay_ms.0..self.armed_delay_ms.1
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

/// Parameters of one run, fixed from `start` to completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub paradigm: Paradigm,
    pub stimulus_kind: StimulusKind,
    pub subject: SubjectId,
    pub total_trials: usize,
}

impl RunSpec {
    pub fn new(
        paradigm: Paradigm,
        stimulus_kind: StimulusKind,
        subject: impl Into<String>,
        total_trials: usize,
    ) -> Self {
        Self {
            paradigm,
            stimulus_kind,
            subject: SubjectId::new(subject),
            total_trials,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_trials < 1 {
            return Err(ExperimentError::InvalidConfiguration(format!(
                "total_trials must be at least 1, got {}",
                self.total_trials
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timing() {
        let config = ExperimentConfig::default();
        assert_eq!(config.armed_delay_range(), 1000..3000);
        assert_eq!(config.response_timeout(), Duration::from_millis(3000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = ExperimentConfig::from_json_str(r#"{"response_timeout_ms": 2000}"#).unwrap();
        assert_eq!(config.response_timeout_ms, 2000);
        assert_eq!(config.armed_delay_ms, (1000, 3000));
    }

    #[test]
    fn rejects_empty_delay_range() {
        let err = ExperimentConfig::from_json_str(r#"{"armed_delay_ms": [500, 500]}"#).unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_zero_trials() {
        let spec = RunSpec::new(Paradigm::Simple, StimulusKind::Color, "s1", 0);
        assert!(matches!(spec.validate(), Err(ExperimentError::InvalidConfiguration(_))));
    }

    #[test]
    fn load_reads_a_file_and_names_a_missing_one() {
        let path = std::env::temp_dir().join(format!("rtlab-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"default_trials": 4}"#).unwrap();
        let config = ExperimentConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.default_trials, 4);
        assert_eq!(config.response_timeout_ms, 3000);

        match ExperimentConfig::load(&path) {
            Err(ExperimentError::InvalidConfiguration(msg)) => {
                assert!(msg.contains("rtlab-config"), "{msg}")
            }
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }
}
