#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the heatmap dashboard.
//!
//! - `Config` and its sections are deserialized from TOML; every section is
//!   optional and falls back to the defaults below.
//! - `Config::validate` enforces the bounded ranges of the interactive
//!   controls (refresh interval, overlay alpha, ...).
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bounds for `[refresh].interval_ms`.
pub const REFRESH_MS_RANGE: std::ops::RangeInclusive<u64> = 100..=2000;
/// Bounds for `[render].alpha`.
pub const ALPHA_RANGE: std::ops::RangeInclusive<f32> = 0.05..=1.0;
/// Cap on `grid.max_dim * render.min_cell_px`, the heat-area side of a full grid.
pub const MAX_HEAT_SIDE_PX: u64 = 8192;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Random generator, no hardware needed
    #[default]
    Simulated,
    /// Polled serial port (requires the `hardware` feature)
    Serial,
    /// Lines pushed over stdin or a FIFO/file
    Push,
}

impl SourceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Serial => "serial",
            Self::Push => "push",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceCfg {
    pub mode: SourceMode,
    /// Longest a single poll may wait for a line (ms)
    pub read_timeout_ms: u64,
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            mode: SourceMode::Simulated,
            read_timeout_ms: 50,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SerialCfg {
    pub port: String,
    pub baud_rate: u32,
}

impl Default for SerialCfg {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PushCfg {
    /// Input stream path; "-" reads standard input
    pub path: PathBuf,
    /// Max queued lines between polls
    pub queue: usize,
}

impl Default for PushCfg {
    fn default() -> Self {
        Self {
            path: PathBuf::from("-"),
            queue: 64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationCfg {
    /// Chance that a poll produces a sample, in [0, 1]
    pub emit_probability: f64,
    /// Samples land in `0..extent` on both axes
    pub extent: usize,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            emit_probability: 0.5,
            extent: 10,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefreshCfg {
    pub interval_ms: u64,
}

impl Default for RefreshCfg {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridCfg {
    /// Coordinates at or beyond this bound are rejected instead of growing the grid
    pub max_dim: usize,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self { max_dim: 256 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderCfg {
    /// Heatmap opacity over the background
    pub alpha: f32,
    pub show_grid: bool,
    pub show_ticks: bool,
    pub show_colorbar: bool,
    /// Pixel budget for the longer grid side
    pub target_px: u32,
    pub min_cell_px: u32,
    pub max_cell_px: u32,
    /// Max tick labels per axis
    pub max_ticks: usize,
    /// Optional background picture (png/jpg)
    pub background: Option<PathBuf>,
}

impl Default for RenderCfg {
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
            background: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportCfg {
    /// Directory receiving map.png / map.csv
    pub dir: PathBuf,
    /// Decimal digits in the CSV export
    pub precision: usize,
}

impl Default for ExportCfg {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
            precision: 6,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub source: SourceCfg,
    pub serial: SerialCfg,
    pub push: PushCfg,
    pub simulation: SimulationCfg,
    pub refresh: RefreshCfg,
    pub grid: GridCfg,
    pub render: RenderCfg,
    pub export: ExportCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file (not validated).
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration in {}: {}", path.display(), e))
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Source
        if self.source.read_timeout_ms == 0 {
            eyre::bail!("source.read_timeout_ms must be >= 1");
        }
        if self.source.read_timeout_ms > 5_000 {
            eyre::bail!("source.read_timeout_ms is unreasonably large (>5s)");
        }
        if self.source.mode == SourceMode::Serial {
            if self.serial.port.trim().is_empty() {
                eyre::bail!("serial.port must be set when source.mode = \"serial\"");
            }
            if self.serial.baud_rate == 0 {
                eyre::bail!("serial.baud_rate must be > 0");
            }
        }
        if self.push.queue == 0 {
            eyre::bail!("push.queue must be >= 1");
        }

        // Simulation
        if !(0.0..=1.0).contains(&self.simulation.emit_probability) {
            eyre::bail!("simulation.emit_probability must be in [0.0, 1.0]");
        }
        if self.simulation.extent == 0 {
            eyre::bail!("simulation.extent must be >= 1");
        }

        // Refresh
        if !REFRESH_MS_RANGE.contains(&self.refresh.interval_ms) {
            eyre::bail!(
                "refresh.interval_ms must be in [{}, {}]",
                REFRESH_MS_RANGE.start(),
                REFRESH_MS_RANGE.end()
            );
        }

        // Grid
        if self.grid.max_dim < 10 {
            eyre::bail!("grid.max_dim must be >= 10");
        }

        // Render
        if !ALPHA_RANGE.contains(&self.render.alpha) {
            eyre::bail!("render.alpha must be in [0.05, 1.0]");
        }
        if self.render.target_px == 0 {
            eyre::bail!("render.target_px must be > 0");
        }
        if self.render.min_cell_px == 0 {
            eyre::bail!("render.min_cell_px must be >= 1");
        }
        if self.render.max_cell_px < self.render.min_cell_px {
            eyre::bail!("render.max_cell_px must be >= render.min_cell_px");
        }
        if self.render.max_cell_px > 200 {
            eyre::bail!("render.max_cell_px is unreasonably large (>200)");
        }
        if (self.grid.max_dim as u64).saturating_mul(u64::from(self.render.min_cell_px))
            > MAX_HEAT_SIDE_PX
        {
            eyre::bail!(
                "grid.max_dim * render.min_cell_px must be <= {MAX_HEAT_SIDE_PX} (heat area side in px)"
            );
        }
        if self.render.max_ticks == 0 {
            eyre::bail!("render.max_ticks must be >= 1");
        }

        // Export
        if self.export.precision > 12 {
            eyre::bail!("export.precision must be in [0, 12]");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never, daily, hourly");
        }

        Ok(())
    }
}
