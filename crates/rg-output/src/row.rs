//! Plain data row types written by output backends.

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:                u64,
    pub unix_time_secs:      i64,
    pub departed:            u64,
    /// `accepted`, `rejected`, or empty when no rumor was offered.
    pub rumor:               &'static str,
    pub live_rumors:         u64,
    pub rerouted:            u64,
    pub no_safe_path:        u64,
    pub unassigned:          u64,
    pub down:                u64,
    pub powered:             u64,
    pub collaborator_errors: u64,
}

/// One bus at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BusStateRow {
    pub tick:    u64,
    pub bus_id:  u32,
    pub name:    String,
    pub kind:    &'static str,
    pub down:    bool,
    pub powered: bool,
    pub load_mw: f64,
    /// Empty in the file when no power-flow solver ran.
    pub voltage: Option<f64>,
}

/// Terminal statistics of one rumor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RumorSummaryRow {
    pub rumor_id:      u32,
    pub label:         String,
    pub created_tick:  u64,
    pub steps:         u64,
    pub population:    u64,
    /// Still believing at the end of the run.
    pub infected:      u64,
    pub ever_infected: u64,
    pub recovered:     u64,
    pub complete:      bool,
    /// Related edge names joined with `;`.
    pub related_edges: String,
}

/// Accumulated vehicle count on one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetCrossingRow {
    pub edge_id:   u32,
    pub edge_name: String,
    pub street:    String,
    pub crossings: u64,
}
