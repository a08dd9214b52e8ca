use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rtlab_core::{
    EngineState, Paradigm, Response, RunStatistics, SimpleVisual, Stimulus, StimulusKind,
};
use rtlab_experiment::{
    ClockEvent, EngineEvent, ExperimentConfig, JsonLinesLedger, RunSpec, TrialStateMachine,
};
use rtlab_timing::{HighPrecisionClock, TrialClock};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::subject::{SimulatedSubject, SubjectProfile};

type Engine =
    TrialStateMachine<HighPrecisionClock<ClockEvent>, StdRng, JsonLinesLedger<BufWriter<File>>>;

/// Upper bound on a single driver sleep so planned responses stay on time.
const MAX_IDLE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RunSection {
    paradigm: Paradigm,
    stimulus_kind: StimulusKind,
    subject: String,
    total_trials: Option<usize>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            paradigm: Paradigm::Simple,
            stimulus_kind: StimulusKind::Color,
            subject: "anonymous".to_string(),
            total_trials: None,
        }
    }
}

/// Contents of the optional JSON file passed as the first argument
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct AppConfig {
    #[serde(flatten)]
    experiment: ExperimentConfig,
    run: RunSection,
    subject: SubjectProfile,
    output: PathBuf,
    seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentConfig::default(),
            run: RunSection::default(),
            subject: SubjectProfile::default(),
            output: PathBuf::from("reaction_results.jsonl"),
            seed: None,
        }
    }
}

impl AppConfig {
    fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// A response the simulated subject will deliver once `due_ns` is reached
struct Planned {
    due_ns: u64,
    response: Response,
}

pub struct App {
    engine: Engine,
    subject: SimulatedSubject,
    spec: RunSpec,
    output: PathBuf,
    planned: Option<Planned>,
}

impl App {
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load(Path::new(path))?,
            None => AppConfig::default(),
        };
        config.subject.validate()?;

        let total_trials = config
            .run
            .total_trials
            .unwrap_or(config.experiment.default_trials);
        let spec = RunSpec::new(
            config.run.paradigm,
            config.run.stimulus_kind,
            config.run.subject.clone(),
            total_trials,
        );

        let file = File::create(&config.output)
            .with_context(|| format!("creating {}", config.output.display()))?;
        let ledger = JsonLinesLedger::new(BufWriter::new(file));
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let engine = TrialStateMachine::new(
            config.experiment.clone(),
            HighPrecisionClock::new(),
            rng,
            ledger,
        )?;
        let subject = SimulatedSubject::new(config.subject.clone(), config.seed);

        Ok(Self {
            engine,
            subject,
            spec,
            output: config.output,
            planned: None,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let kind = if self.spec.paradigm.uses_stimulus_kind() {
            self.spec.stimulus_kind.to_string()
        } else {
            "mixed".to_string()
        };
        println!("=== REACTION TIME RUN ===");
        println!(
            "Paradigm: {} | Stimulus: {} | Subject: {} | Trials: {} | Timeout: {} ms",
            self.spec.paradigm,
            kind,
            self.spec.subject,
            self.spec.total_trials,
            self.engine.config().response_timeout_ms
        );

        let events = self.engine.start(self.spec.clone())?;
        self.handle(events);

        loop {
            match self.engine.state() {
                EngineState::Completed => break,
                EngineState::Idle => {
                    let reason = self.engine.last_fault().unwrap_or("stopped").to_string();
                    anyhow::bail!("run aborted: {reason}");
                }
                _ => {}
            }

            let events = self.engine.poll();
            self.handle(events);
            self.deliver_due_response();
            self.sleep();
        }

        if self.engine.persistence_failures() > 0 {
            warn!(
                failures = self.engine.persistence_failures(),
                "some records were not written"
            );
        }
        info!(output = %self.output.display(), "results written");
        Ok(())
    }

    fn handle(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::RunStarted { .. } => debug!("run started"),
                EngineEvent::StimulusShown(stimulus) => {
                    if let Some((n, total)) = self.engine.trial_progress() {
                        println!("Trial {n}/{total}: {}", describe(&stimulus));
                    }
                    let now = self.engine.clock().now_ns();
                    self.planned = self.subject.react(&stimulus).map(|(delay, response)| Planned {
                        due_ns: now.saturating_add(delay.as_nanos() as u64),
                        response,
                    });
                }
                EngineEvent::ResponseTimeout { index } => {
                    println!("  trial {} timed out", index + 1);
                    self.planned = None;
                }
                EngineEvent::TrialRecorded(trial) => {
                    if !trial.timed_out() {
                        println!(
                            "  {:.1} ms ({})",
                            trial.latency_ms,
                            if trial.is_correct { "correct" } else { "wrong" }
                        );
                    }
                }
                EngineEvent::RunCompleted(stats) => print_statistics(&stats),
                EngineEvent::PersistenceFailed { message } => {
                    eprintln!("  could not save result: {message}");
                }
            }
        }
    }

    fn deliver_due_response(&mut self) {
        let now = self.engine.clock().now_ns();
        if !self.planned.as_ref().is_some_and(|p| p.due_ns <= now) {
            return;
        }
        let Some(planned) = self.planned.take() else {
            return;
        };
        let outcome = self.engine.respond(planned.response);
        if outcome.is_ignored() {
            debug!("late response ignored");
        }
        let events = outcome.events().to_vec();
        self.handle(events);
    }

    fn sleep(&self) {
        let clock = self.engine.clock();
        let max_wait = match &self.planned {
            Some(p) => Duration::from_nanos(p.due_ns.saturating_sub(clock.now_ns())).min(MAX_IDLE),
            None => MAX_IDLE,
        };
        clock.wait_until_next_due(max_wait);
    }
}

/// One-line console rendering of a stimulus.
fn describe(stimulus: &Stimulus) -> String {
    match stimulus {
        Stimulus::Simple(simple) => match &simple.visual {
            SimpleVisual::Color { color, .. } => format!("{} patch", color.name()),
            SimpleVisual::Shape {
                shape,
                color,
                filled,
                ..
            } => {
                let fill = if *filled { "filled" } else { "outlined" };
                format!("{fill} {} {shape:?}", color.name())
            }
            SimpleVisual::Symbol { symbol, .. } => format!("symbol {}", symbol.glyph()),
            SimpleVisual::Text { content, .. } => format!("\"{content}\""),
        },
        Stimulus::Choice(choice) => format!(
            "pick {} among {} options",
            choice.target.label.name(),
            choice.options.len()
        ),
        Stimulus::Disjunctive(disj) => format!(
            "find the {} {:?} among {} items",
            disj.target.color.name(),
            disj.target.shape,
            disj.items().count()
        ),
    }
}

fn print_statistics(stats: &RunStatistics) {
    println!("\n=== RESULTS ===");
    println!(
        "Valid trials: {}/{}",
        stats.valid_trial_count, stats.total_trials
    );
    println!("Accuracy: {:.1}%", stats.accuracy);
    if stats.valid_trial_count > 0 {
        println!("Mean RT: {:.2} ms", stats.mean);
        println!("Std dev: {:.2} ms", stats.stddev);
        println!("Range: {:.2} - {:.2} ms", stats.min, stats.max);
    }
}
