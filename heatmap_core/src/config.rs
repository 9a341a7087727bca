//! Runtime configuration types for the renderer and refresh loop.
//!
//! These are separate from the TOML-deserialized config in `heatmap_config`;
//! see `conversions` for the mapping.

use std::time::Duration;

/// Display options for one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Heatmap opacity over the background, (0.0, 1.0].
    pub alpha: f32,
    /// White lines at cell boundaries.
    pub show_grid: bool,
    /// Row/column index labels.
    pub show_ticks: bool,
    /// Color-scale legend on the right.
    pub show_colorbar: bool,
    /// Pixel budget for the longer grid side.
    pub target_px: u32,
    /// Cell size floor (px).
    pub min_cell_px: u32,
    /// Cell size ceiling (px).
    pub max_cell_px: u32,
    /// Max tick labels per axis; labels are strided evenly.
    pub max_ticks: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            alpha: 0.8,
            show_grid: true,
            show_ticks: true,
            show_colorbar: true,
            target_px: 700,
            min_cell_px: 15,
            max_cell_px: 50,
            max_ticks: 10,
        }
    }
}

/// Refresh loop pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    /// Sleep between cycles.
    pub interval: Duration,
    /// Longest a poll may wait for a line.
    pub source_timeout: Duration,
    /// Stop after this many cycles (None = until shutdown).
    pub max_ticks: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            source_timeout: Duration::from_millis(50),
            max_ticks: None,
        }
    }
}
