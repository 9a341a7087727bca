#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `heatmap`: live 2D heatmap dashboard.

mod cli;
mod console;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use heatmap_config::Config;
use heatmap_core::HeatmapError;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

const DEFAULT_CONFIG: &str = "etc/heatmap.toml";

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        tracing::error!(error = %e, "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let mut cfg = load_config(&cli.config)?;
    init_tracing(cli.json, &cli.log_level, &cfg.logging);
    tracing::debug!(config = %cli.config.display(), mode = cfg.source.mode.as_str(), "config loaded");

    match cli.cmd {
        Commands::Run {
            ticks,
            interval_ms,
            mode,
            out,
            background,
            resume,
            no_console,
        } => {
            if let Some(ms) = interval_ms {
                cfg.refresh.interval_ms = ms;
            }
            if let Some(m) = mode {
                cfg.source.mode = m.into();
            }
            cfg.validate()
                .map_err(|e| HeatmapError::Config(format!("{e:#}")))?;

            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            }

            let opts = run::RunOpts {
                ticks,
                out,
                background,
                resume,
                no_console,
            };
            run::run_live(&cfg, opts, cli.json, &shutdown)
        }
        Commands::Render {
            grid,
            out,
            background,
        } => run::render_file(&cfg, &grid, &out, background.as_deref()),
        Commands::SelfCheck => run::self_check(&cfg, cli.json),
    }
}

/// Load and validate the config; a missing default file means built-in defaults.
fn load_config(path: &Path) -> eyre::Result<Config> {
    let cfg = if !path.exists() && path == Path::new(DEFAULT_CONFIG) {
        Config::default()
    } else {
        heatmap_config::load_file(path).map_err(|e| HeatmapError::Config(format!("{e:#}")))?
    };
    cfg.validate()
        .map_err(|e| HeatmapError::Config(format!("{e:#}")))?;
    Ok(cfg)
}

fn init_tracing(json: bool, level: &str, logging: &heatmap_config::Logging) {
    use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    // RUST_LOG wins over --log-level for the console
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        layers.push(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter)
                .boxed(),
        );
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "heatmap.log".to_string(), |n| n.to_string_lossy().into_owned());
        let _ = std::fs::create_dir_all(dir);
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let file_filter = EnvFilter::new(logging.level.as_deref().unwrap_or("info"));
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter)
                .boxed(),
        );
    }

    let _ = tracing_subscriber::registry().with(layers).try_init();
}
