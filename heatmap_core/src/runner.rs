//! The refresh loop: controls → poll → apply → render → hand off → sleep.
//!
//! Single-threaded. Auxiliary threads only produce input (console controls,
//! push-source reader); the loop drains them without blocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel as xch;
use heatmap_traits::{Clock, LineSource};
use image::RgbaImage;

use crate::config::RunParams;
use crate::error::Result;
use crate::hw_error::map_hw_error;
use crate::render::Renderer;
use crate::session::{Session, SessionStats};
use crate::status::TickOutcome;

/// Operator commands delivered between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Back to a fresh 10×10 zero grid.
    Reset,
    /// Ask the frame handler to write CSV/PNG exports this cycle.
    Export,
    /// Stop after the current cycle boundary.
    Quit,
}

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    Quit,
    TickBudget,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Quit => "quit",
            Self::TickBudget => "tick_budget",
        }
    }
}

/// Everything the output side sees after one cycle.
pub struct Frame<'a> {
    /// 1-based cycle number.
    pub tick: u64,
    pub outcome: &'a TickOutcome,
    pub image: &'a RgbaImage,
    pub session: &'a Session,
    /// An `export` control arrived before this cycle.
    pub export_requested: bool,
    /// A `reset` control was applied before this cycle.
    pub reset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub stats: SessionStats,
    pub elapsed_ms: u64,
    pub stop: StopReason,
}

/// Poll the source once and apply at most one measurement.
///
/// Never fails: malformed lines and transport errors become outcomes.
pub fn tick<S: LineSource + ?Sized>(
    session: &mut Session,
    source: &mut S,
    timeout: Duration,
) -> TickOutcome {
    match source.poll_line(timeout) {
        Ok(Some(line)) => match session.ingest(&line) {
            Ok(m) => {
                tracing::debug!(x = m.x, y = m.y, v = m.v, "measurement applied");
                TickOutcome::Applied(m)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping line");
                TickOutcome::Rejected(e)
            }
        },
        Ok(None) => {
            session.stats.idle += 1;
            TickOutcome::Idle
        }
        Err(e) => {
            let mapped = map_hw_error(&*e);
            session.stats.source_errors += 1;
            tracing::warn!(source = source.describe(), error = %mapped, "no measurement this tick");
            TickOutcome::SourceUnavailable(mapped)
        }
    }
}

/// Run cycles until shutdown, a `Quit` control, or the tick budget.
///
/// Errors from `on_frame` (encoding, file writes) end the run.
#[allow(clippy::too_many_arguments)]
pub fn run<S, C, F>(
    session: &mut Session,
    source: &mut S,
    renderer: &mut Renderer,
    clock: &C,
    params: &RunParams,
    controls: Option<&xch::Receiver<Control>>,
    shutdown: &AtomicBool,
    mut on_frame: F,
) -> Result<RunSummary>
where
    S: LineSource + ?Sized,
    C: Clock + ?Sized,
    F: FnMut(&Frame<'_>) -> Result<()>,
{
    let epoch = clock.now();
    let mut ticks = 0u64;
    tracing::info!(
        source = source.describe(),
        interval_ms = params.interval.as_millis() as u64,
        max_ticks = ?params.max_ticks,
        "refresh loop start"
    );

    let stop = loop {
        if shutdown.load(Ordering::Relaxed) {
            break StopReason::Shutdown;
        }

        let mut export_requested = false;
        let mut reset = false;
        let mut quit = false;
        if let Some(rx) = controls {
            for c in rx.try_iter() {
                tracing::debug!(control = ?c, "control received");
                match c {
                    Control::Reset => {
                        session.reset();
                        reset = true;
                    }
                    Control::Export => export_requested = true,
                    Control::Quit => quit = true,
                }
            }
        }
        if quit {
            break StopReason::Quit;
        }

        ticks += 1;
        session.stats.ticks += 1;
        let outcome = tick(session, source, params.source_timeout);
        let image = renderer.render(session.grid(), session.last());
        on_frame(&Frame {
            tick: ticks,
            outcome: &outcome,
            image: &image,
            session,
            export_requested,
            reset,
        })?;

        if params.max_ticks.is_some_and(|max| ticks >= max) {
            break StopReason::TickBudget;
        }
        clock.sleep(params.interval);
    };

    let summary = RunSummary {
        ticks,
        stats: session.stats(),
        elapsed_ms: clock.ms_since(epoch),
        stop,
    };
    tracing::info!(
        ticks,
        applied = summary.stats.applied,
        rejected = summary.stats.rejected,
        stop = stop.as_str(),
        "refresh loop stopped"
    );
    Ok(summary)
}
