//! Run configuration.
//!
//! Every threshold that varied between experiment runs is a named field
//! here.  The whole tree deserializes from TOML; any omitted field takes the
//! default listed on it.
//!
//! ```toml
//! total_ticks = 2000
//! seed = 7
//!
//! [contagion]
//! infection_probability = 0.05
//! recovery_delay = 10
//!
//! [power]
//! partition_depth = 2
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{RgError, RgResult, SimClock, Tick};

// ── Parameter groups ──────────────────────────────────────────────────────────

/// Contagion-kernel parameters shared by every rumor instance.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContagionParams {
    /// Per infected-neighbour Bernoulli probability of infection per step.
    pub infection_probability: f64,
    /// Instance steps an infected node waits before it may recover.
    pub recovery_delay: u64,
    /// Simulation ticks between two contagion steps.
    pub step_interval_ticks: u64,
}

impl Default for ContagionParams {
    fn default() -> Self {
        Self {
            infection_probability: 0.05,
            recovery_delay:        10,
            step_interval_ticks:   100,
        }
    }
}

/// Rumor injection cadence and classifier thresholds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RumorParams {
    /// Simulation ticks between injection attempts.
    pub interval_ticks: u64,
    /// Chance that an attempt actually injects a rumor.
    pub probability: f64,
    /// A rumor is negative iff its `negative` sentiment score exceeds this.
    pub negative_threshold: f64,
    /// Streets scoring above this are relevant to the rumor.
    pub street_threshold: f64,
}

impl Default for RumorParams {
    fn default() -> Self {
        Self {
            interval_ticks:     50,
            probability:        0.2,
            negative_threshold: 0.35,
            street_threshold:   0.5,
        }
    }
}

/// Failure-injection schedule and power-topology construction parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerParams {
    pub failure_probability:   f64,
    pub partition_probability: f64,
    pub recovery_probability:  f64,
    /// Hop bound of a partition failure.  `0` fails the center alone.
    pub partition_depth:       u32,
    /// Nominal load of a traffic-control bus, restored by `set_up`.
    pub load_mw:               f64,
    /// Number of feeder lines leaving the substation.
    pub feeders:               usize,
}

impl Default for PowerParams {
    fn default() -> Self {
        Self {
            failure_probability:   0.1,
            partition_probability: 0.4,
            recovery_probability:  0.1,
            partition_depth:       2,
            load_mw:               0.02,
            feeders:               3,
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Unix timestamp for tick 0.
    pub start_unix_secs: i64,

    /// Seconds per tick.
    pub tick_duration_secs: u32,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit a bus-state snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    pub contagion: ContagionParams,
    pub rumor:     RumorParams,
    pub power:     PowerParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:       0,
            tick_duration_secs:    1,
            total_ticks:           1_000,
            seed:                  42,
            output_interval_ticks: 1,
            contagion:             ContagionParams::default(),
            rumor:                 RumorParams::default(),
            power:                 PowerParams::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> RgResult<Self> {
        let config: SimConfig =
            toml::from_str(text).map_err(|e| RgError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: &Path) -> RgResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the engines cannot run with.
    pub fn validate(&self) -> RgResult<()> {
        let probabilities = [
            ("contagion.infection_probability", self.contagion.infection_probability),
            ("rumor.probability", self.rumor.probability),
            ("rumor.negative_threshold", self.rumor.negative_threshold),
            ("rumor.street_threshold", self.rumor.street_threshold),
            ("power.failure_probability", self.power.failure_probability),
            ("power.partition_probability", self.power.partition_probability),
            ("power.recovery_probability", self.power.recovery_probability),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(RgError::Config(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if self.tick_duration_secs == 0 {
            return Err(RgError::Config("tick_duration_secs must be positive".into()));
        }
        if self.contagion.step_interval_ticks == 0 {
            return Err(RgError::Config("contagion.step_interval_ticks must be positive".into()));
        }
        if self.rumor.interval_ticks == 0 {
            return Err(RgError::Config("rumor.interval_ticks must be positive".into()));
        }
        if self.power.load_mw < 0.0 {
            return Err(RgError::Config("power.load_mw must not be negative".into()));
        }
        Ok(())
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }
}
