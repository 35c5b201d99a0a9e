//! JSON-lines snapshot stream.
//!
//! Stand-in for a network broadcaster: every actor snapshot is encoded and
//! written the moment the scheduler emits it, one JSON object per line.

use std::io::Write;

use arena_core::Tick;
use arena_sim::{ActorSnapshot, SimObserver, TickSummary};

use crate::{OutputError, OutputResult};

/// Writes `{"id":…,"type":…,"position":{"x":…,"y":…},"crashes":…}` lines to
/// `out`, flushing at the end of every tick.
pub struct JsonLinesBroadcaster<W: Write> {
    out:        W,
    sent:       u64,
    last_error: Option<OutputError>,
}

impl<W: Write> JsonLinesBroadcaster<W> {
    pub fn new(out: W) -> Self {
        Self { out, sent: 0, last_error: None }
    }

    /// Snapshots written so far.
    #[inline]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Take the first stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn send(&mut self, snapshot: &ActorSnapshot) -> OutputResult<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: Write> SimObserver for JsonLinesBroadcaster<W> {
    fn on_actor_snapshot(&mut self, _tick: Tick, snapshot: &ActorSnapshot) {
        // A broken stream stays broken; don't retry every actor.
        if self.last_error.is_some() {
            return;
        }
        let result = self.send(snapshot);
        if result.is_ok() {
            self.sent += 1;
        }
        self.store_err(result);
    }

    fn on_tick_end(&mut self, _summary: &TickSummary) {
        if self.last_error.is_none() {
            let result = self.out.flush().map_err(OutputError::from);
            self.store_err(result);
        }
    }
}
