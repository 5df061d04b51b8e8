//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `dispatch_log` and `positions`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DispatchLogRow, OutputResult, PositionRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS dispatch_log (
                 vehicle_id   TEXT    NOT NULL,
                 target_id    TEXT    NOT NULL,
                 timestamp_ms INTEGER NOT NULL,
                 tick         INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS positions (
                 tick        INTEGER NOT NULL,
                 vehicle_id  TEXT    NOT NULL,
                 lng         REAL    NOT NULL,
                 lat         REAL    NOT NULL,
                 heading_rad REAL    NOT NULL,
                 state       TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_dispatch(&mut self, row: &DispatchLogRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO dispatch_log (vehicle_id, target_id, timestamp_ms, tick) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.vehicle_id, row.target_id, row.timestamp_ms, row.tick as i64],
        )?;
        Ok(())
    }

    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO positions \
                 (tick, vehicle_id, lng, lat, heading_rad, state) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.vehicle_id,
                    row.lng,
                    row.lat,
                    row.heading_rad,
                    row.state,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
