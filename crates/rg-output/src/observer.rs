//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use rg_core::{SimConfig, Tick};
use rg_sim::{PowerSnapshot, RunSummary, SimObserver, TickReport};

use crate::row::{BusStateRow, RumorSummaryRow, StreetCrossingRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes tick summaries, bus-state snapshots, and
/// end-of-run statistics to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    start_unix_secs:    i64,
    tick_duration_secs: u32,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            start_unix_secs:    config.start_unix_secs,
            tick_duration_secs: config.tick_duration_secs,
            last_error:         None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn unix_time(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64 * self.tick_duration_secs as i64
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        let rumor = report.rumor.as_ref().map_or("", |outcome| outcome.as_str());
        let row = TickSummaryRow {
            tick:                report.tick.0,
            unix_time_secs:      self.unix_time(report.tick),
            departed:            report.departed as u64,
            rumor,
            live_rumors:         report.live_rumors as u64,
            rerouted:            report.rerouted as u64,
            no_safe_path:        report.no_safe_path as u64,
            unassigned:          report.unassigned as u64,
            down:                report.down as u64,
            powered:             report.powered as u64,
            collaborator_errors: report.collaborator_errors as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, power: &PowerSnapshot<'_>) {
        let rows: Vec<BusStateRow> = power
            .bus_states()
            .map(|s| BusStateRow {
                tick:    tick.0,
                bus_id:  s.bus.0,
                name:    s.name.to_owned(),
                kind:    s.kind.as_str(),
                down:    s.down,
                powered: s.powered,
                load_mw: s.load_mw,
                voltage: s.voltage,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_bus_states(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, summary: &RunSummary) {
        let edge_name = |i: usize| summary.crossings.get(i).map_or_else(|| i.to_string(), |c| c.edge_name.clone());

        let rumors: Vec<RumorSummaryRow> = summary
            .rumors
            .iter()
            .map(|r| RumorSummaryRow {
                rumor_id:      r.id.0,
                label:         r.label.clone(),
                created_tick:  r.created_at.0,
                steps:         r.steps,
                population:    r.population as u64,
                infected:      r.infected as u64,
                ever_infected: (r.infected + r.recovered) as u64,
                recovered:     r.recovered as u64,
                complete:      r.complete,
                related_edges: r.related_edges.iter().map(|e| edge_name(e.index())).collect::<Vec<_>>().join(";"),
            })
            .collect();
        let result = self.writer.write_rumor_summaries(&rumors);
        self.store_err(result);

        let crossings: Vec<StreetCrossingRow> = summary
            .crossings
            .iter()
            .map(|c| StreetCrossingRow {
                edge_id:   c.edge.0,
                edge_name: c.edge_name.clone(),
                street:    c.street.clone().unwrap_or_default(),
                crossings: c.count,
            })
            .collect();
        let result = self.writer.write_street_crossings(&crossings);
        self.store_err(result);

        let result = self.writer.finish();
        self.store_err(result);
    }
}
