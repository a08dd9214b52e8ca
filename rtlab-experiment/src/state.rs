use std::time::Duration;

use super::catalog::StimulusCatalog;
use super::config::{ExperimentConfig, RunSpec};
use super::events::{ClockEvent, EngineEvent, ResponseOutcome};
use super::ledger::RunLedger;
use super::trial::PendingTrial;
use rand::Rng;
use rtlab_core::{
    summarize, EngineState, ExperimentError, LedgerError, Response, Result, Run, RunStatistics,
    Stimulus, Trial,
};
use rtlab_timing::{CancelToken, Fired, TrialClock};
use tracing::{debug, error, info, warn};

/// Drives runs of trials: armed delay, stimulus, response or timeout,
/// recording, and statistics once the last trial is in.
///
/// The engine never blocks. Clock items are pulled with [`poll`] and
/// responses are pushed with [`respond`]; each call runs its transition to
/// completion and returns the events it emitted.
///
/// [`poll`]: TrialStateMachine::poll
/// [`respond`]: TrialStateMachine::respond
pub struct TrialStateMachine<C, R, L>
where
    C: TrialClock<ClockEvent>,
    R: Rng,
    L: RunLedger,
{
    config: ExperimentConfig,
    clock: C,
    rng: R,
    ledger: L,
    state: EngineState,
    run: Option<Run>,
    pending: Option<PendingTrial>,
    armed: Option<CancelToken>,
    current_trial_index: usize,
    last_statistics: Option<RunStatistics>,
    sessions: u64,
    persistence_failures: usize,
    last_fault: Option<String>,
}

impl<C, R, L> TrialStateMachine<C, R, L>
where
    C: TrialClock<ClockEvent>,
    R: Rng,
    L: RunLedger,
{
    pub fn new(config: ExperimentConfig, clock: C, rng: R, ledger: L) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            rng,
            ledger,
            state: EngineState::Idle,
            run: None,
            pending: None,
            armed: None,
            current_trial_index: 0,
            last_statistics: None,
            sessions: 0,
            persistence_failures: 0,
            last_fault: None,
        })
    }

    /// Opens a run and arms the first trial.
    pub fn start(&mut self, spec: RunSpec) -> Result<Vec<EngineEvent>> {
        if self.state.is_active() {
            return Err(ExperimentError::AlreadyRunning);
        }
        spec.validate()?;

        self.sessions += 1;
        let run = Run::new(
            spec.paradigm,
            spec.stimulus_kind,
            spec.total_trials,
            spec.subject,
            self.sessions,
        );
        info!(
            subject = %run.subject,
            session = run.session,
            paradigm = %run.paradigm,
            kind = %run.stimulus_kind,
            total_trials = run.total_trials,
            "run started"
        );
        let event = EngineEvent::RunStarted {
            paradigm: run.paradigm,
            stimulus_kind: run.stimulus_kind,
            total_trials: run.total_trials,
        };

        self.run = Some(run);
        self.pending = None;
        self.current_trial_index = 0;
        self.last_statistics = None;
        self.state = EngineState::Armed;
        self.arm();

        Ok(vec![event])
    }

    /// Processes every clock item that is due, one at a time.
    pub fn poll(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Some(fired) = self.clock.pop_due() {
            self.dispatch(fired, &mut events);
        }
        events
    }

    /// Scores a response against the stimulus on screen. Outside the
    /// response window the call is a no-op. A response that lands after the
    /// timeout deadline, before the timeout item was polled, records the
    /// trial as timed out.
    pub fn respond(&mut self, response: Response) -> ResponseOutcome {
        if !self.state.accepts_response() {
            debug!(state = ?self.state, "response ignored");
            return ResponseOutcome::Ignored;
        }
        let Some(pending) = self.pending.take() else {
            self.fault("response window open without a pending trial");
            return ResponseOutcome::Ignored;
        };

        self.clock.cancel(pending.timeout);
        let now_ns = self.clock.now_ns();
        let mut events = Vec::new();

        if pending.is_overdue(now_ns) {
            debug!(
                index = pending.index,
                late_by_ns = now_ns - pending.deadline_ns,
                "response after the window closed, recording a timeout"
            );
            let trial = self.expire(pending, &mut events);
            return ResponseOutcome::Recorded { trial, events };
        }

        let trial = pending.respond(response, now_ns);
        debug!(
            index = trial.index,
            latency_ms = trial.latency_ms,
            correct = trial.is_correct,
            "response scored"
        );
        self.state = EngineState::Scored;
        self.record(trial.clone(), &mut events);
        ResponseOutcome::Recorded { trial, events }
    }

    /// Abandons the active run without statistics. No-op when idle or
    /// completed.
    pub fn stop(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.reset();
        info!(session = self.sessions, "run stopped");
    }

    fn dispatch(&mut self, fired: Fired<ClockEvent>, events: &mut Vec<EngineEvent>) {
        let live_armed = self.armed == Some(fired.token);
        let live_timeout = self.pending.as_ref().map(|p| p.timeout) == Some(fired.token);

        match fired.item {
            ClockEvent::ArmedDelayElapsed if live_armed && self.state == EngineState::Armed => {
                self.armed = None;
                self.present(events);
            }
            ClockEvent::ResponseTimeout
                if live_timeout && self.state == EngineState::StimulusShown =>
            {
                if let Some(pending) = self.pending.take() {
                    self.expire(pending, events);
                }
            }
            _ if live_armed || live_timeout => {
                self.fault("clock delivered a live token with the wrong item");
            }
            item => warn!(token = fired.token.id(), ?item, "stale clock item dropped"),
        }
    }

    fn arm(&mut self) {
        let delay_ms = self.rng.random_range(self.config.armed_delay_range());
        let token = self
            .clock
            .schedule(Duration::from_millis(delay_ms), ClockEvent::ArmedDelayElapsed);
        self.armed = Some(token);
        debug!(index = self.current_trial_index, delay_ms, "armed");
    }

    fn present(&mut self, events: &mut Vec<EngineEvent>) {
        let Some((paradigm, kind)) = self.run.as_ref().map(|r| (r.paradigm, r.stimulus_kind))
        else {
            self.fault("armed delay elapsed without an active run");
            return;
        };

        let stimulus = StimulusCatalog::generate(paradigm, kind, &mut self.rng);
        let presented_at_ns = self.clock.now_ns();
        let window = self.config.response_timeout();
        let timeout = self.clock.schedule(window, ClockEvent::ResponseTimeout);

        self.pending = Some(PendingTrial {
            index: self.current_trial_index,
            stimulus: stimulus.clone(),
            presented_at_ns,
            deadline_ns: presented_at_ns.saturating_add(window.as_nanos() as u64),
            timeout,
        });
        self.state = EngineState::StimulusShown;
        debug!(index = self.current_trial_index, presented_at_ns, "stimulus shown");
        events.push(EngineEvent::StimulusShown(stimulus));
    }

    fn expire(&mut self, pending: PendingTrial, events: &mut Vec<EngineEvent>) -> Trial {
        let index = pending.index;
        let trial = pending.time_out(self.config.response_timeout_ms);
        debug!(index, "response timed out");
        self.state = EngineState::TimedOut;
        events.push(EngineEvent::ResponseTimeout { index });
        self.record(trial.clone(), events);
        trial
    }

    fn record(&mut self, trial: Trial, events: &mut Vec<EngineEvent>) {
        let appended = match self.run.as_mut() {
            Some(run) if run.trials.len() == trial.index && trial.index < run.total_trials => {
                run.trials.push(trial.clone());
                Some((run.context(), run.is_complete()))
            }
            _ => None,
        };
        let Some((ctx, last)) = appended else {
            self.fault("recorded trial does not fit the active run");
            return;
        };

        if let Err(e) = self.ledger.append_trial(&trial, &ctx) {
            self.persistence_failed(e, events);
        }
        events.push(EngineEvent::TrialRecorded(trial));

        match self.state.after_recording(last) {
            Some(EngineState::Completed) => self.complete(events),
            Some(EngineState::Armed) => {
                self.current_trial_index += 1;
                self.state = EngineState::Armed;
                self.arm();
            }
            _ => self.fault("recording outside a scoring transition"),
        }
    }

    fn complete(&mut self, events: &mut Vec<EngineEvent>) {
        let Some(run) = self.run.as_ref() else {
            self.fault("completion without an active run");
            return;
        };
        let stats = summarize(&run.trials);
        let ctx = run.context();

        self.state = EngineState::Completed;
        if let Err(e) = self.ledger.append_run_summary(&stats, &ctx) {
            self.persistence_failed(e, events);
        }
        self.last_statistics = Some(stats);
        info!(
            session = ctx.session,
            mean_ms = stats.mean,
            accuracy = stats.accuracy,
            valid = stats.valid_trial_count,
            "run completed"
        );
        events.push(EngineEvent::RunCompleted(stats));
    }

    fn persistence_failed(&mut self, e: LedgerError, events: &mut Vec<EngineEvent>) {
        self.persistence_failures += 1;
        let err = ExperimentError::PersistenceWrite(e);
        warn!(error = %err, failures = self.persistence_failures, "ledger write failed");
        events.push(EngineEvent::PersistenceFailed {
            message: err.to_string(),
        });
    }

    /// Forces the engine back to idle after an invariant break.
    fn fault(&mut self, reason: &str) {
        let err = ExperimentError::Internal(reason.to_string());
        error!(error = %err, state = ?self.state, "engine fault, resetting to idle");
        self.last_fault = Some(err.to_string());
        self.reset();
    }

    fn reset(&mut self) {
        if let Some(token) = self.armed.take() {
            self.clock.cancel(token);
        }
        if let Some(pending) = self.pending.take() {
            self.clock.cancel(pending.timeout);
        }
        self.run = None;
        self.current_trial_index = 0;
        self.state = EngineState::Idle;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn current_stimulus(&self) -> Option<&Stimulus> {
        self.pending.as_ref().map(|p| &p.stimulus)
    }

    pub fn current_trial_index(&self) -> usize {
        self.current_trial_index
    }

    /// 1-based number of the trial in progress and the run length.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        if !self.state.is_active() {
            return None;
        }
        self.run
            .as_ref()
            .map(|r| (self.current_trial_index + 1, r.total_trials))
    }

    /// The active run, or the last completed one.
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn last_statistics(&self) -> Option<&RunStatistics> {
        self.last_statistics.as_ref()
    }

    pub fn persistence_failures(&self) -> usize {
        self.persistence_failures
    }

    pub fn last_fault(&self) -> Option<&str> {
        self.last_fault.as_deref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }
}
