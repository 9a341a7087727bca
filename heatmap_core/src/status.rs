//! Outcome of one refresh cycle.

use crate::error::{HeatmapError, IngestError};
use crate::measurement::Measurement;

#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// A line arrived and was applied to the grid.
    Applied(Measurement),
    /// Nothing arrived within the poll timeout.
    Idle,
    /// A line arrived but was malformed or out of range; grid unchanged.
    Rejected(IngestError),
    /// The transport failed; treated as "nothing this tick".
    SourceUnavailable(HeatmapError),
}

impl TickOutcome {
    /// Stable label for logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::Idle => "idle",
            Self::Rejected(_) => "rejected",
            Self::SourceUnavailable(_) => "source_unavailable",
        }
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            Self::Applied(m) => Some(m),
            _ => None,
        }
    }

    /// Human-readable reason for non-applied outcomes.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Rejected(e) => Some(e.to_string()),
            Self::SourceUnavailable(e) => Some(e.to_string()),
            Self::Applied(_) | Self::Idle => None,
        }
    }
}
