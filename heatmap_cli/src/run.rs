//! Command execution: source assembly, the live loop's output side, offline
//! render and self-check.

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{SystemTime, UNIX_EPOCH};

use eyre::WrapErr;
use heatmap_config::{Config, SourceMode};
use heatmap_core::error::Result as CoreResult;
use heatmap_core::export::{load_csv, save_csv, save_png};
use heatmap_core::hw_error::map_hw_error;
use heatmap_core::{Frame, HeatmapError, RenderOptions, Renderer, RunParams, Session, load_background};
use heatmap_hardware::{PushSource, SimulatedSource};
use heatmap_traits::{LineSource, MonotonicClock};

use crate::console;

/// Env override for a reproducible simulated stream (tests, demos).
pub const SIM_SEED_ENV: &str = "HEATMAP_TEST_SIM_SEED";

pub const PNG_NAME: &str = "map.png";
pub const CSV_NAME: &str = "map.csv";

/// `run` subcommand options after CLI parsing.
#[derive(Debug, Default)]
pub struct RunOpts {
    pub ticks: Option<u64>,
    pub out: Option<PathBuf>,
    pub background: Option<PathBuf>,
    pub resume: Option<PathBuf>,
    pub no_console: bool,
}

fn io_err(what: &str, path: &Path, e: impl std::fmt::Display) -> HeatmapError {
    HeatmapError::Io(format!("{what} {}: {e}", path.display()))
}

/// Assemble the configured line source.
pub fn build_source(cfg: &Config) -> CoreResult<Box<dyn LineSource>> {
    match cfg.source.mode {
        SourceMode::Simulated => {
            let sim = &cfg.simulation;
            let seed = sim.seed.or_else(|| {
                std::env::var(SIM_SEED_ENV)
                    .ok()
                    .and_then(|s| s.trim().parse().ok())
            });
            tracing::info!(extent = sim.extent, emit_probability = sim.emit_probability, seed = ?seed, "simulated source");
            Ok(match seed {
                Some(s) => Box::new(SimulatedSource::seeded(s, sim.extent, sim.emit_probability)),
                None => Box::new(SimulatedSource::new(sim.extent, sim.emit_probability)),
            })
        }
        SourceMode::Push => {
            let path = &cfg.push.path;
            let src = PushSource::open(path, cfg.push.queue)
                .map_err(|e| io_err("open push source", path, e))?;
            tracing::info!(path = %path.display(), queue = cfg.push.queue, "push source");
            Ok(Box::new(src))
        }
        SourceMode::Serial => serial_source(cfg),
    }
}

#[cfg(feature = "hardware")]
fn serial_source(cfg: &Config) -> CoreResult<Box<dyn LineSource>> {
    tracing::info!(port = %cfg.serial.port, baud_rate = cfg.serial.baud_rate, "serial source");
    Ok(Box::new(heatmap_hardware::SerialSource::new(
        &cfg.serial.port,
        cfg.serial.baud_rate,
    )))
}

#[cfg(not(feature = "hardware"))]
fn serial_source(_cfg: &Config) -> CoreResult<Box<dyn LineSource>> {
    Err(HeatmapError::Config(
        "source.mode = \"serial\" requires a build with feature `hardware`".to_string(),
    )
    .into())
}

fn renderer_for(cfg: &Config, background: Option<&Path>) -> CoreResult<Renderer> {
    let mut renderer = Renderer::new(RenderOptions::from(&cfg.render));
    if let Some(path) = background.or(cfg.render.background.as_deref()) {
        renderer.set_background(Some(load_background(path)?));
        tracing::info!(path = %path.display(), "background loaded");
    }
    Ok(renderer)
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// One JSONL record per refresh cycle.
pub fn tick_json(frame: &Frame<'_>) -> serde_json::Value {
    let m = frame.outcome.measurement();
    let grid = frame.session.grid();
    serde_json::json!({
        "timestamp": unix_ms(),
        "tick": frame.tick,
        "outcome": frame.outcome.as_str(),
        "x": m.map(|m| m.x),
        "y": m.map(|m| m.y),
        "v": m.map(|m| m.v),
        "rows": grid.rows(),
        "cols": grid.cols(),
        "notice": frame.outcome.notice(),
    })
}

/// The live dashboard loop.
pub fn run_live(cfg: &Config, opts: RunOpts, json: bool, shutdown: &Arc<AtomicBool>) -> CoreResult<()> {
    let out_dir = opts.out.clone().unwrap_or_else(|| cfg.export.dir.clone());
    std::fs::create_dir_all(&out_dir).map_err(|e| io_err("create output dir", &out_dir, e))?;
    let png_path = out_dir.join(PNG_NAME);
    let csv_path = out_dir.join(CSV_NAME);
    let precision = cfg.export.precision;

    let mut renderer = renderer_for(cfg, opts.background.as_deref())?;
    let mut session = match &opts.resume {
        Some(path) => {
            let grid = load_csv(path)?;
            tracing::info!(path = %path.display(), rows = grid.rows(), cols = grid.cols(), "resuming grid");
            Session::with_grid(grid, cfg.grid.max_dim)
        }
        None => Session::new(cfg.grid.max_dim),
    };
    let mut source = build_source(cfg)?;

    let push_reads_stdin = cfg.source.mode == SourceMode::Push && cfg.push.path.as_os_str() == "-";
    if push_reads_stdin && !opts.no_console {
        tracing::info!("console disabled: stdin carries measurements");
    }
    let controls = (!opts.no_console && !push_reads_stdin)
        .then(|| console::spawn(BufReader::new(std::io::stdin())));

    let mut params = RunParams::from(cfg);
    params.max_ticks = opts.ticks;
    let clock = MonotonicClock::new();

    let summary = heatmap_core::runner::run(
        &mut session,
        &mut source,
        &mut renderer,
        &clock,
        &params,
        controls.as_ref(),
        shutdown,
        |frame| {
            save_png(&png_path, frame.image).wrap_err("write frame")?;
            if frame.export_requested {
                save_csv(&csv_path, frame.session.grid(), precision).wrap_err("export grid")?;
                tracing::info!(csv = %csv_path.display(), png = %png_path.display(), "exported");
            }
            if json {
                println!("{}", tick_json(frame));
            }
            Ok(())
        },
    )?;

    // Final export
    save_csv(&csv_path, session.grid(), precision).wrap_err("export grid")?;
    let image = renderer.render(session.grid(), session.last());
    save_png(&png_path, &image).wrap_err("write frame")?;

    let (rows, cols) = session.grid().shape();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "timestamp": unix_ms(),
                "stop": summary.stop.as_str(),
                "ticks": summary.ticks,
                "applied": summary.stats.applied,
                "rejected": summary.stats.rejected,
                "idle": summary.stats.idle,
                "source_errors": summary.stats.source_errors,
                "resets": summary.stats.resets,
                "rows": rows,
                "cols": cols,
                "csv": csv_path.display().to_string(),
                "png": png_path.display().to_string(),
            })
        );
    } else {
        println!(
            "stopped ({}) after {} cycles: {} applied, {} rejected; grid {rows}x{cols} written to {}",
            summary.stop.as_str(),
            summary.ticks,
            summary.stats.applied,
            summary.stats.rejected,
            out_dir.display()
        );
    }
    Ok(())
}

/// Offline render of an exported grid.
pub fn render_file(cfg: &Config, grid_path: &Path, out: &Path, background: Option<&Path>) -> CoreResult<()> {
    let grid = load_csv(grid_path)?;
    let mut renderer = renderer_for(cfg, background)?;
    let image = renderer.render(&grid, None);
    save_png(out, &image).wrap_err("write png")?;
    println!(
        "rendered {}x{} grid to {} ({}x{} px)",
        grid.rows(),
        grid.cols(),
        out.display(),
        image.width(),
        image.height()
    );
    Ok(())
}

/// Poll the configured source once.
pub fn self_check(cfg: &Config, json: bool) -> CoreResult<()> {
    let mut source = build_source(cfg)?;
    let timeout = RunParams::from(cfg).source_timeout;
    let line = source
        .poll_line(timeout)
        .map_err(|e| map_hw_error(&*e))?;
    tracing::info!(source = source.describe(), got_line = line.is_some(), "self-check poll");
    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "source": source.describe(), "line": line })
        );
    } else {
        println!("ok");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_simulation_is_reproducible() {
        let mut cfg = Config::default();
        cfg.simulation.seed = Some(7);
        cfg.simulation.emit_probability = 1.0;
        let mut a = build_source(&cfg).unwrap();
        let mut b = build_source(&cfg).unwrap();
        let t = std::time::Duration::from_millis(1);
        for _ in 0..5 {
            assert_eq!(a.poll_line(t).unwrap(), b.poll_line(t).unwrap());
        }
    }

    #[test]
    fn missing_push_file_is_io_error() {
        let mut cfg = Config::default();
        cfg.source.mode = SourceMode::Push;
        cfg.push.path = PathBuf::from("/definitely/not/here.txt");
        let err = build_source(&cfg).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<HeatmapError>(),
            Some(HeatmapError::Io(_))
        ));
    }
}
