//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use arena_core::{ActorId, Tick};
use arena_sandbox::ScriptFault;
use arena_sim::{ActorSnapshot, SimObserver, TickSummary};

use crate::row::{ActorSnapshotRow, ScriptFaultRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records snapshots, faults, and tick summaries to
/// any [`OutputWriter`] backend.
///
/// Snapshots are buffered for the duration of a sweep and written as one
/// batch when it ends.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value; check with
/// [`take_error`][Self::take_error] after the run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<ActorSnapshotRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Needed after `run_ticks`, which never calls
    /// `on_sim_end`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_actor_snapshot(&mut self, tick: Tick, snapshot: &ActorSnapshot) {
        self.pending.push(ActorSnapshotRow::new(tick, snapshot));
    }

    fn on_script_fault(&mut self, tick: Tick, actor: ActorId, fault: &ScriptFault) {
        let result = self.writer.write_fault(&ScriptFaultRow::new(tick, actor.0, fault));
        self.store_err(result);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
