//! The `OutputWriter` trait implemented by backend writers.

use crate::{BusStateRow, OutputResult, RumorSummaryRow, StreetCrossingRow, TickSummaryRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write every bus of one snapshot.
    fn write_bus_states(&mut self, rows: &[BusStateRow]) -> OutputResult<()>;

    /// Write the end-of-run rumor statistics.
    fn write_rumor_summaries(&mut self, rows: &[RumorSummaryRow]) -> OutputResult<()>;

    /// Write the end-of-run crossing totals.
    fn write_street_crossings(&mut self, rows: &[StreetCrossingRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
