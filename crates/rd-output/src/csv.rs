//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `dispatch_log.csv`
//! - `positions.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DispatchLogRow, OutputResult, PositionRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    dispatches: Writer<File>,
    positions:  Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut dispatches = Writer::from_path(dir.join("dispatch_log.csv"))?;
        dispatches.write_record(["vehicle_id", "target_id", "timestamp_ms", "tick"])?;

        let mut positions = Writer::from_path(dir.join("positions.csv"))?;
        positions.write_record(["tick", "vehicle_id", "lng", "lat", "heading_rad", "state"])?;

        Ok(Self {
            dispatches,
            positions,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_dispatch(&mut self, row: &DispatchLogRow) -> OutputResult<()> {
        self.dispatches.write_record(&[
            row.vehicle_id.clone(),
            row.target_id.clone(),
            row.timestamp_ms.to_string(),
            row.tick.to_string(),
        ])?;
        // Audit entries are rare; keep the file current.
        self.dispatches.flush()?;
        Ok(())
    }

    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.tick.to_string(),
                row.vehicle_id.clone(),
                format!("{:.7}", row.lng),
                format!("{:.7}", row.lat),
                format!("{:.5}", row.heading_rad),
                row.state.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.dispatches.flush()?;
        self.positions.flush()?;
        Ok(())
    }
}
