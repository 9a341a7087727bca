//! `From` implementations bridging `heatmap_config` types to `heatmap_core` types.

use crate::config::{RenderOptions, RunParams};
use crate::util::refresh_interval;
use std::time::Duration;

// ── RenderOptions ────────────────────────────────────────────────────────────

impl From<&heatmap_config::RenderCfg> for RenderOptions {
    fn from(c: &heatmap_config::RenderCfg) -> Self {
        Self {
            alpha: c.alpha,
            show_grid: c.show_grid,
            show_ticks: c.show_ticks,
            show_colorbar: c.show_colorbar,
            target_px: c.target_px,
            min_cell_px: c.min_cell_px,
            max_cell_px: c.max_cell_px,
            max_ticks: c.max_ticks,
        }
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&heatmap_config::Config> for RunParams {
    fn from(c: &heatmap_config::Config) -> Self {
        Self {
            interval: refresh_interval(c.refresh.interval_ms),
            source_timeout: Duration::from_millis(c.source.read_timeout_ms.max(1)),
            max_ticks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_line_up() {
        let cfg = heatmap_config::Config::default();
        assert_eq!(RenderOptions::from(&cfg.render), RenderOptions::default());
        assert_eq!(RunParams::from(&cfg), RunParams::default());
    }

    #[test]
    fn interval_is_bounded() {
        let mut cfg = heatmap_config::Config::default();
        cfg.refresh.interval_ms = 10;
        assert_eq!(RunParams::from(&cfg).interval, Duration::from_millis(100));
    }
}
