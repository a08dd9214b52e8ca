use rtlab_core::{Response, Selection, Stimulus, Trial, TrialOutcome};
use rtlab_timing::CancelToken;

/// A stimulus on screen, waiting for a response or its timeout
#[derive(Debug, Clone)]
pub struct PendingTrial {
    pub index: usize,
    pub stimulus: Stimulus,
    pub presented_at_ns: u64,
    /// Clock time at which the response window closes.
    pub deadline_ns: u64,
    pub timeout: CancelToken,
}

impl PendingTrial {
    /// A response at exactly the deadline still counts.
    pub fn is_overdue(&self, now_ns: u64) -> bool {
        now_ns > self.deadline_ns
    }

    pub fn respond(self, response: Response, now_ns: u64) -> Trial {
        let latency_ns = now_ns.saturating_sub(self.presented_at_ns);
        let is_correct = judge(&self.stimulus, &response);
        Trial {
            index: self.index,
            stimulus: self.stimulus,
            presented_at_ns: self.presented_at_ns,
            outcome: TrialOutcome::Responded {
                at_ns: now_ns,
                response,
            },
            latency_ms: latency_ns as f64 / 1_000_000.0,
            is_correct,
        }
    }

    pub fn time_out(self, timeout_ms: u64) -> Trial {
        Trial {
            index: self.index,
            stimulus: self.stimulus,
            presented_at_ns: self.presented_at_ns,
            outcome: TrialOutcome::TimedOut,
            latency_ms: timeout_ms as f64,
            is_correct: false,
        }
    }
}

/// Correctness of `response` to `stimulus` under the stimulus' paradigm.
pub fn judge(stimulus: &Stimulus, response: &Response) -> bool {
    match (stimulus, response.selection()) {
        (Stimulus::Simple(_), _) => true,
        (Stimulus::Choice(c), Some(Selection::Label(label))) => *label == c.target.label,
        (Stimulus::Disjunctive(d), Some(Selection::Item(item))) => *item == d.target,
        _ => false,
    }
}
