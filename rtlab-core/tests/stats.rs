use rtlab_core::{
    summarize, Color, Response, SimpleStimulus, SimpleVisual, Stimulus, StimulusKind, Trial,
    TrialOutcome,
};

fn stimulus() -> Stimulus {
    Stimulus::Simple(SimpleStimulus {
        kind: StimulusKind::Color,
        visual: SimpleVisual::Color {
            color: Color::Red,
            size: 80,
        },
    })
}

fn answered(index: usize, latency_ms: f64, is_correct: bool) -> Trial {
    Trial {
        index,
        stimulus: stimulus(),
        presented_at_ns: 0,
        outcome: TrialOutcome::Responded {
            at_ns: (latency_ms * 1_000_000.0) as u64,
            response: Response::Generic,
        },
        latency_ms,
        is_correct,
    }
}

fn timed_out(index: usize) -> Trial {
    Trial {
        index,
        stimulus: stimulus(),
        presented_at_ns: 0,
        outcome: TrialOutcome::TimedOut,
        latency_ms: 3000.0,
        is_correct: false,
    }
}

#[test]
fn empty_run_is_all_zero() {
    let stats = summarize(&[]);
    assert_eq!(stats.mean, 0.0);
    assert_eq!(stats.stddev, 0.0);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 0.0);
    assert_eq!(stats.accuracy, 0.0);
    assert_eq!(stats.valid_trial_count, 0);
    assert_eq!(stats.total_trials, 0);
}

#[test]
fn timeouts_count_against_accuracy_but_not_latency() {
    let stats = summarize(&[answered(0, 100.0, true), answered(1, 200.0, true), timed_out(2)]);
    assert_eq!(stats.mean, 150.0);
    assert_eq!(stats.min, 100.0);
    assert_eq!(stats.max, 200.0);
    assert!((stats.stddev - 50.0).abs() < 1e-9);
    assert!((stats.accuracy - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.valid_trial_count, 2);
    assert_eq!(stats.total_trials, 3);
}

#[test]
fn incorrect_answers_are_excluded_from_latency() {
    let stats = summarize(&[answered(0, 400.0, true), answered(1, 90.0, false)]);
    assert_eq!(stats.mean, 400.0);
    assert_eq!(stats.min, 400.0);
    assert_eq!(stats.max, 400.0);
    assert_eq!(stats.stddev, 0.0);
    assert_eq!(stats.accuracy, 50.0);
    assert_eq!(stats.valid_trial_count, 1);
}

#[test]
fn all_timeouts_default_latency_to_zero() {
    let stats = summarize(&[timed_out(0), timed_out(1)]);
    assert_eq!(stats.mean, 0.0);
    assert!(!stats.stddev.is_nan());
    assert_eq!(stats.accuracy, 0.0);
    assert_eq!(stats.valid_trial_count, 0);
    assert_eq!(stats.total_trials, 2);
}

#[test]
fn trial_serializes_with_outcome_tag() {
    let json = serde_json::to_value(timed_out(4)).unwrap();
    assert_eq!(json["outcome"]["outcome"], "timed_out");
    assert_eq!(json["stimulus"]["paradigm"], "simple");
    assert_eq!(json["index"], 4);
}
