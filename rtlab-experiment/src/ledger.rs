use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use rtlab_core::{LedgerError, RunContext, RunStatistics, SubjectId, Trial};
use serde::Serialize;

/// Write-only sink for completed trials and run summaries
pub trait RunLedger {
    fn append_trial(&mut self, trial: &Trial, ctx: &RunContext) -> Result<(), LedgerError>;

    fn append_run_summary(
        &mut self,
        stats: &RunStatistics,
        ctx: &RunContext,
    ) -> Result<(), LedgerError>;
}

impl<L: RunLedger + ?Sized> RunLedger for Box<L> {
    fn append_trial(&mut self, trial: &Trial, ctx: &RunContext) -> Result<(), LedgerError> {
        (**self).append_trial(trial, ctx)
    }

    fn append_run_summary(
        &mut self,
        stats: &RunStatistics,
        ctx: &RunContext,
    ) -> Result<(), LedgerError> {
        (**self).append_run_summary(stats, ctx)
    }
}

/// In-memory ledger with history lookups by subject
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    pub trials: Vec<(RunContext, Trial)>,
    pub summaries: Vec<(RunContext, RunStatistics)>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trials of `subject`, most recent first, capped at `limit`.
    pub fn trials_for(&self, subject: &SubjectId, limit: usize) -> Vec<&Trial> {
        self.trials
            .iter()
            .rev()
            .filter(|(ctx, _)| &ctx.subject == subject)
            .map(|(_, t)| t)
            .take(limit)
            .collect()
    }

    /// Run summaries of `subject`, most recent first, capped at `limit`.
    pub fn summaries_for(&self, subject: &SubjectId, limit: usize) -> Vec<&RunStatistics> {
        self.summaries
            .iter()
            .rev()
            .filter(|(ctx, _)| &ctx.subject == subject)
            .map(|(_, s)| s)
            .take(limit)
            .collect()
    }
}

impl RunLedger for MemoryLedger {
    fn append_trial(&mut self, trial: &Trial, ctx: &RunContext) -> Result<(), LedgerError> {
        self.trials.push((ctx.clone(), trial.clone()));
        Ok(())
    }

    fn append_run_summary(
        &mut self,
        stats: &RunStatistics,
        ctx: &RunContext,
    ) -> Result<(), LedgerError> {
        self.summaries.push((ctx.clone(), *stats));
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum LedgerRecord<'a> {
    Trial {
        recorded_at_ms: u64,
        #[serde(flatten)]
        context: &'a RunContext,
        trial: &'a Trial,
    },
    Summary {
        recorded_at_ms: u64,
        #[serde(flatten)]
        context: &'a RunContext,
        statistics: &'a RunStatistics,
    },
}

/// Appends one JSON object per line to any writer
#[derive(Debug)]
pub struct JsonLinesLedger<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesLedger<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record(&mut self, record: &LedgerRecord<'_>) -> Result<(), LedgerError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> RunLedger for JsonLinesLedger<W> {
    fn append_trial(&mut self, trial: &Trial, ctx: &RunContext) -> Result<(), LedgerError> {
        self.write_record(&LedgerRecord::Trial {
            recorded_at_ms: unix_ms(),
            context: ctx,
            trial,
        })
    }

    fn append_run_summary(
        &mut self,
        stats: &RunStatistics,
        ctx: &RunContext,
    ) -> Result<(), LedgerError> {
        self.write_record(&LedgerRecord::Summary {
            recorded_at_ms: unix_ms(),
            context: ctx,
            statistics: stats,
        })
    }
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
