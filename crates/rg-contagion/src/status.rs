//! Per-person rumor status.

/// Where one person stands with respect to one rumor.
///
/// Transitions are monotonic: `Susceptible → Infected → Recovered`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub enum Status {
    /// Has not heard the rumor.
    #[default]
    Susceptible,
    /// Believes the rumor and avoids its streets.
    Infected,
    /// Heard the rumor and no longer acts on it.
    Recovered,
}

impl Status {
    /// `true` iff `self → next` is allowed (including staying put).
    #[inline]
    pub fn can_become(self, next: Status) -> bool {
        self <= next
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Susceptible => "susceptible",
            Status::Infected    => "infected",
            Status::Recovered   => "recovered",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
