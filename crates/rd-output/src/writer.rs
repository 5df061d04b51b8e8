//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DispatchLogRow, OutputResult, PositionRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Append one dispatch log entry.
    fn write_dispatch(&mut self, row: &DispatchLogRow) -> OutputResult<()>;

    /// Write a batch of position snapshot rows.
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
