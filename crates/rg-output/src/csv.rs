//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `tick_summaries.csv`
//! - `bus_states.csv`
//! - `rumor_summaries.csv`
//! - `street_crossings.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BusStateRow, OutputResult, RumorSummaryRow, StreetCrossingRow, TickSummaryRow};

pub const TICK_SUMMARY_HEADER: [&str; 11] = [
    "tick", "unix_time_secs", "departed", "rumor", "live_rumors", "rerouted",
    "no_safe_path", "unassigned", "down", "powered", "collaborator_errors",
];
pub const BUS_STATE_HEADER: [&str; 8] =
    ["tick", "bus_id", "name", "kind", "down", "powered", "load_mw", "voltage_pu"];
pub const RUMOR_SUMMARY_HEADER: [&str; 10] = [
    "rumor_id", "label", "created_tick", "steps", "population", "infected", "ever_infected",
    "recovered", "complete", "related_edges",
];
pub const STREET_CROSSING_HEADER: [&str; 4] = ["edge_id", "edge_name", "street", "crossings"];

/// Writes simulation output to four CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    buses:     Writer<File>,
    rumors:    Writer<File>,
    crossings: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the four CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TICK_SUMMARY_HEADER)?;

        let mut buses = Writer::from_path(dir.join("bus_states.csv"))?;
        buses.write_record(BUS_STATE_HEADER)?;

        let mut rumors = Writer::from_path(dir.join("rumor_summaries.csv"))?;
        rumors.write_record(RUMOR_SUMMARY_HEADER)?;

        let mut crossings = Writer::from_path(dir.join("street_crossings.csv"))?;
        crossings.write_record(STREET_CROSSING_HEADER)?;

        Ok(Self { summaries, buses, rumors, crossings, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.departed.to_string(),
            row.rumor.to_owned(),
            row.live_rumors.to_string(),
            row.rerouted.to_string(),
            row.no_safe_path.to_string(),
            row.unassigned.to_string(),
            row.down.to_string(),
            row.powered.to_string(),
            row.collaborator_errors.to_string(),
        ])?;
        Ok(())
    }

    fn write_bus_states(&mut self, rows: &[BusStateRow]) -> OutputResult<()> {
        for row in rows {
            self.buses.write_record(&[
                row.tick.to_string(),
                row.bus_id.to_string(),
                row.name.clone(),
                row.kind.to_owned(),
                (row.down as u8).to_string(),
                (row.powered as u8).to_string(),
                row.load_mw.to_string(),
                row.voltage.map(|v| v.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_rumor_summaries(&mut self, rows: &[RumorSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.rumors.write_record(&[
                row.rumor_id.to_string(),
                row.label.clone(),
                row.created_tick.to_string(),
                row.steps.to_string(),
                row.population.to_string(),
                row.infected.to_string(),
                row.ever_infected.to_string(),
                row.recovered.to_string(),
                (row.complete as u8).to_string(),
                row.related_edges.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_street_crossings(&mut self, rows: &[StreetCrossingRow]) -> OutputResult<()> {
        for row in rows {
            self.crossings.write_record(&[
                row.edge_id.to_string(),
                row.edge_name.clone(),
                row.street.clone(),
                row.crossings.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.buses.flush()?;
        self.rumors.flush()?;
        self.crossings.flush()?;
        Ok(())
    }
}
