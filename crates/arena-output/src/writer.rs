//! The `OutputWriter` trait implemented by history backends.

use crate::{ActorSnapshotRow, OutputResult, ScriptFaultRow, TickSummaryRow};

/// Trait implemented by history writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one sweep's worth of actor snapshots.
    fn write_snapshots(&mut self, rows: &[ActorSnapshotRow]) -> OutputResult<()>;

    /// Write one faulted step.
    fn write_fault(&mut self, row: &ScriptFaultRow) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
