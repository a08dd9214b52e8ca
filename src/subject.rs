use std::time::Duration;

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtlab_core::{Response, Selection, Stimulus};
use serde::Deserialize;

/// Behaviour of the simulated participant
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubjectProfile {
    /// Fastest plausible response.
    pub base_latency_ms: u64,
    /// Upper bound of the extra latency added on top of the base.
    pub jitter_ms: u64,
    /// Extra decision time per paradigm beyond simple detection.
    pub decision_ms: u64,
    /// Probability of picking the target when a selection is needed.
    pub accuracy: f64,
    /// Probability of not responding at all.
    pub miss_rate: f64,
}

impl Default for SubjectProfile {
    fn default() -> Self {
        Self {
            base_latency_ms: 180,
            jitter_ms: 220,
            decision_ms: 150,
            accuracy: 0.9,
            miss_rate: 0.05,
        }
    }
}

impl SubjectProfile {
    /// Rejects probabilities outside `[0, 1]`, NaN included.
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [("accuracy", self.accuracy), ("miss_rate", self.miss_rate)] {
            ensure!(
                (0.0..=1.0).contains(&p),
                "subject {name} must be a probability in [0, 1], got {p}"
            );
        }
        Ok(())
    }
}

/// Stands in for the input adapter: turns stimuli into timed responses
pub struct SimulatedSubject {
    profile: SubjectProfile,
    rng: StdRng,
}

impl SimulatedSubject {
    pub fn new(profile: SubjectProfile, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ 0x5eed),
            None => StdRng::from_os_rng(),
        };
        Self { profile, rng }
    }

    /// Response to `stimulus` and the delay before it arrives, or `None` for
    /// a miss. Expects a profile that passed [`SubjectProfile::validate`].
    pub fn react(&mut self, stimulus: &Stimulus) -> Option<(Duration, Response)> {
        if self.rng.random_bool(self.profile.miss_rate) {
            return None;
        }
        let hit = self.rng.random_bool(self.profile.accuracy);
        let jitter = self.rng.random_range(0..=self.profile.jitter_ms);

        let (decision, response) = match stimulus {
            Stimulus::Simple(_) => (0, Response::Generic),
            Stimulus::Choice(c) => {
                let others: Vec<_> = c
                    .options
                    .iter()
                    .filter(|o| o.label != c.target.label)
                    .collect();
                let label = if hit || others.is_empty() {
                    c.target.label
                } else {
                    others[self.rng.random_range(0..others.len())].label
                };
                (self.profile.decision_ms, Response::Select(Selection::Label(label)))
            }
            Stimulus::Disjunctive(d) => {
                let item = if hit || d.distractors.is_empty() {
                    d.target
                } else {
                    d.distractors[self.rng.random_range(0..d.distractors.len())]
                };
                (
                    self.profile.decision_ms * 3 / 2,
                    Response::Select(Selection::Item(item)),
                )
            }
        };

        let latency = self.profile.base_latency_ms + decision + jitter;
        Some((Duration::from_millis(latency), response))
    }
}
