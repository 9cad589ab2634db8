//! `rg-output` — simulation output writers for rumor_grid.
//!
//! | Backend | Files created                                                                    |
//! |---------|----------------------------------------------------------------------------------|
//! | CSV     | `tick_summaries.csv`, `bus_states.csv`, `rumor_summaries.csv`, `street_crossings.csv` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `rg_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rg_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{BusStateRow, RumorSummaryRow, StreetCrossingRow, TickSummaryRow};
pub use writer::OutputWriter;
