//! Per-run application state threaded through the refresh loop.

use crate::error::IngestError;
use crate::grid::Grid;
use crate::measurement::Measurement;

/// Default bound on accepted coordinates.
pub const DEFAULT_MAX_DIM: usize = 256;

/// Running totals for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    pub applied: u64,
    pub rejected: u64,
    pub idle: u64,
    pub source_errors: u64,
    pub resets: u64,
}

/// The grid plus everything the display needs about it.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    last: Option<Measurement>,
    max_dim: usize,
    pub(crate) stats: SessionStats,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIM)
    }
}

impl Session {
    pub fn new(max_dim: usize) -> Self {
        Self::with_grid(Grid::new(), max_dim)
    }

    /// Resume from a previously exported grid.
    pub fn with_grid(grid: Grid, max_dim: usize) -> Self {
        Self {
            grid,
            last: None,
            max_dim: max_dim.max(1),
            stats: SessionStats::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn last(&self) -> Option<&Measurement> {
        self.last.as_ref()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn max_dim(&self) -> usize {
        self.max_dim
    }

    /// Parse a raw line and apply it. Rejected lines leave the grid untouched.
    pub fn ingest(&mut self, line: &str) -> Result<Measurement, IngestError> {
        let m = Measurement::parse(line).map_err(|source| IngestError::Parse {
            line: line.trim().to_string(),
            source,
        });
        match m {
            Ok(m) => self.apply(m),
            Err(e) => {
                self.stats.rejected += 1;
                Err(e)
            }
        }
    }

    /// Apply an already parsed measurement.
    pub fn apply(&mut self, m: Measurement) -> Result<Measurement, IngestError> {
        if m.x >= self.max_dim || m.y >= self.max_dim {
            self.stats.rejected += 1;
            return Err(IngestError::OutOfRange {
                x: m.x,
                y: m.y,
                max_dim: self.max_dim,
            });
        }
        self.grid.apply(m.x, m.y, m.v);
        self.last = Some(m);
        self.stats.applied += 1;
        Ok(m)
    }

    /// Back to a fresh 10×10 zero grid; the caption is cleared too.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.last = None;
        self.stats.resets += 1;
        tracing::info!("grid reset");
    }
}
