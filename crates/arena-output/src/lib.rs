//! `arena-output` — where snapshots go once the scheduler emits them.
//!
//! | Observer                      | Output                                              |
//! |-------------------------------|-----------------------------------------------------|
//! | [`JsonLinesBroadcaster`]      | One JSON object per actor snapshot, per line        |
//! | [`SimOutputObserver`] + CSV   | `actor_snapshots.csv`, `script_faults.csv`, `tick_summaries.csv` |
//!
//! History backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `arena_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arena_output::{CsvWriter, JsonLinesBroadcaster, SimOutputObserver};
//!
//! let mut stream = JsonLinesBroadcaster::new(std::io::stdout().lock());
//! let mut history = SimOutputObserver::new(CsvWriter::new(Path::new("./out"))?);
//! sim.run(&mut (&mut stream, &mut history));
//! history.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod broadcast;
pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use broadcast::JsonLinesBroadcaster;
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{ActorSnapshotRow, ScriptFaultRow, TickSummaryRow};
pub use writer::OutputWriter;
