//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use rd_core::Tick;
use rd_fleet::VehicleRegistry;
use rd_sim::{DispatchRecord, SimObserver};
use tracing::warn;

use crate::row::{DispatchLogRow, PositionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes the dispatch log and position snapshots to
/// any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the simulation stops, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:        W,
    dispatches:    u64,
    position_rows: u64,
    last_error:    Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            dispatches:    0,
            position_rows: 0,
            last_error:    None,
        }
    }

    /// Take the stored write error (if any) after the simulation stops.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Dispatch log entries written so far.
    pub fn dispatches_written(&self) -> u64 {
        self.dispatches
    }

    /// Position rows written so far.
    pub fn position_rows_written(&self) -> u64 {
        self.position_rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                // Keep only the first error.
                if self.last_error.is_none() {
                    warn!(error = %e, "output write failed; further errors suppressed");
                    self.last_error = Some(e);
                }
                false
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_dispatch(&mut self, record: &DispatchRecord) {
        let result = self.writer.write_dispatch(&DispatchLogRow::from(record));
        if self.store_err(result) {
            self.dispatches += 1;
        }
    }

    fn on_snapshot(&mut self, tick: Tick, fleet: &VehicleRegistry) {
        let rows: Vec<PositionRow> = fleet.iter().map(|v| PositionRow::of(tick.0, v)).collect();
        if rows.is_empty() {
            return;
        }
        let result = self.writer.write_positions(&rows);
        if self.store_err(result) {
            self.position_rows += rows.len() as u64;
        }
    }

    fn on_stop(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
