//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "heatmap", version, about = "Live 2D heatmap dashboard")]
pub struct Cli {
    /// Path to config TOML (typed); built-in defaults apply when the default path is absent
    #[arg(long, value_name = "FILE", default_value = "etc/heatmap.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty; per-cycle records go to stdout
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Source selection on the command line; mirrors `[source] mode`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    /// Random measurements, no hardware needed
    Simulated,
    /// Polled serial port (build with feature `hardware`)
    Serial,
    /// Lines pushed on stdin or a file/FIFO
    Push,
}

impl From<ModeArg> for heatmap_config::SourceMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Simulated => Self::Simulated,
            ModeArg::Serial => Self::Serial,
            ModeArg::Push => Self::Push,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the live dashboard: poll, update, rewrite map.png every cycle
    Run {
        /// Stop after this many refresh cycles (default: until Ctrl-C or `quit`)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Refresh interval in milliseconds (overrides refresh.interval_ms)
        #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(100..=2000))]
        interval_ms: Option<u64>,
        /// Measurement source (overrides source.mode)
        #[arg(long, value_enum, value_name = "MODE")]
        mode: Option<ModeArg>,
        /// Output directory for map.png / map.csv (overrides export.dir)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Background picture drawn under the heatmap (overrides render.background)
        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,
        /// Start from a previously exported grid instead of a fresh 10x10
        #[arg(long, value_name = "CSV")]
        resume: Option<PathBuf>,
        /// Do not read console commands (reset/export/quit) from stdin
        #[arg(long, action = ArgAction::SetTrue)]
        no_console: bool,
    },
    /// Render an exported grid CSV to a PNG
    Render {
        /// Grid CSV as written by `run`
        #[arg(long, value_name = "CSV")]
        grid: PathBuf,
        /// Output PNG path
        #[arg(long, value_name = "PNG")]
        out: PathBuf,
        /// Background picture drawn under the heatmap
        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,
    },
    /// Validate config and poll the configured source once
    SelfCheck,
}
