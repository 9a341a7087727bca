use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crossbeam_channel as xch;
use heatmap_core::mocks::ScriptedSource;
use heatmap_core::runner::{self, Control, StopReason};
use heatmap_core::{Grid, RenderOptions, Renderer, RunParams, Session, TickOutcome};
use heatmap_traits::ManualClock;

fn params(max_ticks: u64) -> RunParams {
    RunParams {
        interval: Duration::from_millis(500),
        source_timeout: Duration::from_millis(5),
        max_ticks: Some(max_ticks),
    }
}

#[test]
fn malformed_line_does_not_stop_the_loop() {
    let mut session = Session::default();
    let mut source = ScriptedSource::new()
        .line("1,1,0.5")
        .line("abc,def")
        .line("2,2,0.25");
    let mut renderer = Renderer::new(RenderOptions::default());
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut outcomes = Vec::new();

    let summary = runner::run(
        &mut session,
        &mut source,
        &mut renderer,
        &clock,
        &params(3),
        None,
        &stop,
        |frame| {
            outcomes.push(frame.outcome.as_str());
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(outcomes, ["applied", "rejected", "applied"]);
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.stop, StopReason::TickBudget);
    assert_eq!(summary.stats.rejected, 1);
    assert_eq!(session.grid().get(1, 1), Some(0.5));
    assert_eq!(session.grid().get(2, 2), Some(0.25));
}

#[test]
fn sleeps_between_cycles_through_the_clock() {
    let mut session = Session::default();
    let mut source = ScriptedSource::new();
    let mut renderer = Renderer::new(RenderOptions::default());
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);

    let summary = runner::run(
        &mut session,
        &mut source,
        &mut renderer,
        &clock,
        &params(4),
        None,
        &stop,
        |_| Ok(()),
    )
    .unwrap();

    assert_eq!(source.polls(), 4);
    assert_eq!(clock.sleeps(), 3);
    assert_eq!(summary.elapsed_ms, 1_500);
    assert_eq!(summary.stats.idle, 4);
}

#[test]
fn reset_and_export_controls_reach_the_frame() {
    let mut session = Session::default();
    session.ingest("20,20,1").unwrap();
    let mut source = ScriptedSource::new().idle();
    let mut renderer = Renderer::new(RenderOptions::default());
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let (tx, rx) = xch::unbounded();
    tx.send(Control::Reset).unwrap();
    tx.send(Control::Export).unwrap();

    let mut seen = None;
    runner::run(
        &mut session,
        &mut source,
        &mut renderer,
        &clock,
        &params(1),
        Some(&rx),
        &stop,
        |frame| {
            seen = Some((frame.reset, frame.export_requested, frame.session.grid().shape()));
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(seen, Some((true, true, (10, 10))));
    assert_eq!(session.grid(), &Grid::new());
    assert!(session.last().is_none());
}

#[test]
fn quit_control_and_shutdown_flag_stop_before_polling() {
    let mut session = Session::default();
    let mut source = ScriptedSource::new().line("1,1,1");
    let mut renderer = Renderer::new(RenderOptions::default());
    let clock = ManualClock::new();

    let (tx, rx) = xch::unbounded();
    tx.send(Control::Quit).unwrap();
    let stop = AtomicBool::new(false);
    let summary = runner::run(
        &mut session,
        &mut source,
        &mut renderer,
        &clock,
        &RunParams::default(),
        Some(&rx),
        &stop,
        |_| Ok(()),
    )
    .unwrap();
    assert_eq!(summary.stop, StopReason::Quit);
    assert_eq!(source.polls(), 0);

    let stop = AtomicBool::new(true);
    let summary = runner::run(
        &mut session,
        &mut source,
        &mut renderer,
        &clock,
        &RunParams::default(),
        None,
        &stop,
        |_| Ok(()),
    )
    .unwrap();
    assert_eq!(summary.stop, StopReason::Shutdown);
    assert_eq!(summary.ticks, 0);
}

#[test]
fn source_failure_is_nothing_this_tick() {
    let mut session = Session::default();
    let mut source = ScriptedSource::new()
        .fail(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"))
        .fail("port unplugged");
    let o1 = runner::tick(&mut session, &mut source, Duration::from_millis(1));
    let o2 = runner::tick(&mut session, &mut source, Duration::from_millis(1));
    assert!(matches!(
        o1,
        TickOutcome::SourceUnavailable(heatmap_core::HeatmapError::SourceTimeout)
    ));
    assert!(matches!(o2, TickOutcome::SourceUnavailable(_)));
    assert_eq!(session.stats().source_errors, 2);
    assert_eq!(session.grid(), &Grid::new());
}

#[test]
fn frame_handler_error_ends_the_run() {
    let mut session = Session::default();
    let mut source = ScriptedSource::new();
    let mut renderer = Renderer::new(RenderOptions::default());
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);

    let err = runner::run(
        &mut session,
        &mut source,
        &mut renderer,
        &clock,
        &RunParams::default(),
        None,
        &stop,
        |_| Err(heatmap_core::HeatmapError::Io("disk full".into()).into()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("disk full"));
    assert_eq!(clock.sleeps(), 0);
}
