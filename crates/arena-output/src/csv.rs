//! CSV history backend.
//!
//! Creates three files in the configured output directory:
//! - `actor_snapshots.csv`
//! - `script_faults.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ActorSnapshotRow, OutputResult, ScriptFaultRow, TickSummaryRow};

/// Writes simulation history to three CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    faults:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("actor_snapshots.csv"))?;
        snapshots.write_record(["tick", "actor_id", "type", "x", "y", "crashes"])?;

        let mut faults = Writer::from_path(dir.join("script_faults.csv"))?;
        faults.write_record(["tick", "actor_id", "kind", "message"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "actors", "faults", "elapsed_us"])?;

        Ok(Self {
            snapshots,
            faults,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[ActorSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.actor_id.to_string(),
                row.behavior_type.clone(),
                row.x.to_string(),
                row.y.to_string(),
                row.crashes.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_fault(&mut self, row: &ScriptFaultRow) -> OutputResult<()> {
        self.faults.write_record(&[
            row.tick.to_string(),
            row.actor_id.to_string(),
            row.kind.clone(),
            row.message.clone(),
        ])?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.actors.to_string(),
            row.faults.to_string(),
            row.elapsed_us.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.faults.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
