use serde::{Deserialize, Serialize};

use crate::trial::Trial;

/// Summary of a completed run. Latency figures are in milliseconds and
/// cover correct, non-timeout trials only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    /// Percentage of trials judged correct, timeouts included in the denominator.
    pub accuracy: f64,
    pub valid_trial_count: usize,
    pub total_trials: usize,
}

/// Reduces recorded trials to run statistics. An empty slice yields zeros.
pub fn summarize(trials: &[Trial]) -> RunStatistics {
    let latencies: Vec<f64> = trials
        .iter()
        .filter(|t| t.is_valid())
        .map(|t| t.latency_ms)
        .collect();

    let correct = trials.iter().filter(|t| t.is_correct).count();
    let accuracy = if trials.is_empty() {
        0.0
    } else {
        correct as f64 / trials.len() as f64 * 100.0
    };

    if latencies.is_empty() {
        return RunStatistics {
            accuracy,
            total_trials: trials.len(),
            ..RunStatistics::default()
        };
    }

    let n = latencies.len() as f64;
    let mean = latencies.iter().sum::<f64>() / n;
    let var = latencies.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let min = latencies.iter().copied().fold(f64::INFINITY, f64::min);
    let max = latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    RunStatistics {
        mean,
        stddev: var.sqrt(),
        min,
        max,
        accuracy,
        valid_trial_count: latencies.len(),
        total_trials: trials.len(),
    }
}
