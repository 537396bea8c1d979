//! End-to-end host behavior against the recording engine.

use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use simhost_core::{
    Chrome, CycleState, Identity, KeyDown, MenuCommand, Modifiers, PointerButton,
    PointerInput, RawInput, SurfaceFrame, SurfaceSize,
};
use simhost_render::{Canvas, CompositeOutcome, SkipReason};
use simhost_runtime::{
    EngineRecord, ExitCode, Flow, Host, HostConfig, ManualClock, RecordingEngine, RecordingExit,
    SurfaceState,
};

const NOW: u64 = 1_700_000_000;

type TestHost = Host<RecordingEngine, RecordingExit, ManualClock>;

fn host_with(engine: RecordingEngine, config: HostConfig) -> TestHost {
    Host::with_parts(
        engine,
        config.with_seed(11),
        RecordingExit::default(),
        ManualClock::new(NOW),
    )
}

fn host(engine: RecordingEngine) -> TestHost {
    host_with(engine, HostConfig::new())
}

fn pixels(size: SurfaceSize) -> Vec<u32> {
    vec![0; size.area() as usize]
}

#[test]
fn round_trip_keeps_engine_identity() {
    let size = SurfaceSize::new(100, 80);
    let mut host = host(RecordingEngine::new().with_init(5));
    let id = host.open_surface(None, SurfaceFrame::from_size(100.0, 80.0));
    assert_eq!(host.start(id), Flow::Continue);
    assert_eq!(
        host.surface(id).map(|s| s.identity()),
        Some(Identity::new(5))
    );

    let mut buf = pixels(size);
    let mut canvas = Canvas::new(&mut buf, size, 0).expect("canvas");

    assert_eq!(host.next_redraw(), Some(id));
    let report = host.redraw(id, size, &mut canvas);
    assert_eq!(report.state, Some(CycleState::Ok));
    assert_eq!(report.composite, Some(CompositeOutcome::Drawn(size)));
    assert_eq!(report.flow, Flow::Continue);
    assert_eq!(canvas.pixel(99, 79), Some(0x0020_4060));

    assert_eq!(host.next_redraw(), Some(id));
    host.clock().advance(1);
    host.redraw(id, size, &mut canvas);

    let records = host.engine().records();
    assert!(matches!(
        records[0],
        EngineRecord::Init {
            identity: Identity::VIEW,
            ..
        }
    ));
    assert_eq!(
        records[1..].to_vec(),
        vec![
            EngineRecord::Cycle {
                time_secs: NOW,
                identity: Identity::new(5)
            },
            EngineRecord::Draw {
                identity: Identity::new(5),
                size,
                changed: false
            },
            EngineRecord::Cycle {
                time_secs: NOW + 1,
                identity: Identity::new(5)
            },
            EngineRecord::Draw {
                identity: Identity::new(5),
                size,
                changed: false
            },
        ]
    );
}

#[test]
fn quit_closes_once_and_stops_compositing() {
    let size = SurfaceSize::new(10, 10);
    let mut host = host(RecordingEngine::new().with_cycles([CycleState::Quit]));
    let id = host.open_surface(None, SurfaceFrame::from_size(10.0, 10.0));
    host.start(id);

    let mut buf = pixels(size);
    let mut canvas = Canvas::new(&mut buf, size, 0).expect("canvas");
    let report = host.redraw(id, size, &mut canvas);

    assert_eq!(report.state, Some(CycleState::Quit));
    assert_eq!(report.composite, None);
    assert_eq!(report.flow, Flow::Terminated);
    assert_eq!(host.engine().closes(), 1);
    assert_eq!(host.engine().draws(), 0);
    assert_eq!(host.exit().codes(), &[ExitCode::Success]);
    assert_eq!(host.engine().records().last(), Some(&EngineRecord::Close));

    assert_eq!(host.next_redraw(), None);
    let again = host.redraw(id, size, &mut canvas);
    assert_eq!(again.state, None);
    assert_eq!(host.engine().draws(), 0);
    assert_eq!(
        host.surface(id).map(|s| s.state()),
        Some(SurfaceState::Terminated)
    );
}

#[test]
fn new_agents_uses_a_fresh_seed_and_continues() {
    let size = SurfaceSize::new(4, 4);
    let mut host = host(RecordingEngine::new().with_cycles([CycleState::NewAgents]));
    let id = host.open_surface(None, SurfaceFrame::from_size(4.0, 4.0));
    host.start(id);

    let mut buf = pixels(size);
    let mut canvas = Canvas::new(&mut buf, size, 0).expect("canvas");
    let report = host.redraw(id, size, &mut canvas);

    assert_eq!(report.state, Some(CycleState::NewAgents));
    assert_eq!(report.flow, Flow::Continue);
    assert!(report.composite.is_some_and(|c| c.is_drawn()));

    let init_seed = host
        .engine()
        .records()
        .iter()
        .find_map(|r| match r {
            EngineRecord::Init { seed, .. } => Some(*seed),
            _ => None,
        })
        .expect("init recorded");
    let seeds = host.engine().new_agent_seeds();
    assert_eq!(seeds.len(), 1);
    assert_ne!(seeds[0], init_seed);
    assert!(host.redraw_pending(id));
    assert_eq!(host.engine().closes(), 0);
}

#[test]
fn debug_output_needs_no_reaction() {
    let size = SurfaceSize::new(2, 2);
    let mut host = host(RecordingEngine::new().with_cycles([CycleState::DebugOutput]));
    let id = host.open_surface(None, SurfaceFrame::default());
    host.start(id);

    let mut buf = pixels(size);
    let mut canvas = Canvas::new(&mut buf, size, 0).expect("canvas");
    host.redraw(id, size, &mut canvas);

    let surface = host.surface(id).expect("surface");
    assert!(surface.driver().is_debug_output());
    assert!(host.engine().new_agent_seeds().is_empty());
    assert!(host.redraw_pending(id));
}

#[test]
fn init_failure_shuts_down_without_running() {
    let mut host = host(RecordingEngine::new().with_init(Identity::RAW_INIT_FAILURE));
    let id = host.open_surface(Some("Terrain"), SurfaceFrame::default());

    assert_eq!(host.start(id), Flow::Terminated);
    assert_eq!(host.engine().closes(), 1);
    assert_eq!(host.exit().codes(), &[ExitCode::InitFailure]);
    assert_eq!(host.next_redraw(), None);
    assert!(host.engine().cycle_identities().is_empty());
    assert_eq!(
        host.surface(id).map(|s| s.state()),
        Some(SurfaceState::Terminated)
    );
}

#[test]
fn repeated_shutdown_is_single() {
    let mut host = host(RecordingEngine::new());
    let id = host.open_surface(None, SurfaceFrame::default());
    host.start(id);
    host.quit();
    host.close_surface(id);
    host.quit();

    assert_eq!(host.engine().closes(), 1);
    assert_eq!(host.exit().codes().len(), 1);
    assert!(host.is_terminated());
}

#[test]
fn zero_sized_surface_skips_frame_and_keeps_looping() {
    let mut host = host(RecordingEngine::new());
    let id = host.open_surface(None, SurfaceFrame::default());
    host.start(id);

    let mut buf: Vec<u32> = Vec::new();
    let mut canvas = Canvas::new(&mut buf, SurfaceSize::new(0, 0), 0).expect("canvas");
    let report = host.redraw(id, SurfaceSize::new(0, 0), &mut canvas);

    assert_eq!(
        report.composite,
        Some(CompositeOutcome::Skipped(SkipReason::EmptySurface))
    );
    assert_eq!(report.flow, Flow::Continue);
    assert_eq!(host.engine().draws(), 0);
    assert!(host.redraw_pending(id));
}

#[test]
fn chrome_is_removed_before_drawing() {
    let outer = SurfaceSize::new(100, 108);
    let config = HostConfig::new().with_chrome(Chrome::new(Chrome::TITLE_BAR));
    let mut host = host_with(RecordingEngine::new(), config);
    let id = host.open_surface(None, SurfaceFrame::default());
    host.start(id);

    let mut buf = pixels(outer);
    let mut canvas = Canvas::new(&mut buf, outer, Chrome::TITLE_BAR).expect("canvas");
    let report = host.redraw(id, outer, &mut canvas);

    assert_eq!(
        report.composite,
        Some(CompositeOutcome::Drawn(SurfaceSize::new(100, 80)))
    );
    assert_eq!(canvas.pixel(0, 27), Some(0));
    assert_eq!(canvas.pixel(0, 28), Some(0x0020_4060));
}

#[test]
fn surfaces_interleave_with_their_own_identities() {
    let size = SurfaceSize::new(2, 2);
    let mut host = host(RecordingEngine::new());
    let terrain = host.open_surface(Some("Terrain"), SurfaceFrame::default());
    let control = host.open_surface(Some("Control"), SurfaceFrame::default());
    host.start(terrain);
    host.start(control);

    let mut buf = pixels(size);
    let mut canvas = Canvas::new(&mut buf, size, 0).expect("canvas");
    for _ in 0..4 {
        let id = host.next_redraw().expect("pending redraw");
        host.redraw(id, size, &mut canvas);
    }

    assert_eq!(
        host.engine().cycle_identities(),
        vec![
            Identity::TERRAIN,
            Identity::CONTROL,
            Identity::TERRAIN,
            Identity::CONTROL
        ]
    );
}

#[test]
fn input_reaches_engine_with_surface_identity() {
    let mut host = host(RecordingEngine::new());
    let id = host.open_surface(Some("Terrain"), SurfaceFrame::from_size(200.0, 100.0));
    host.start(id);
    host.engine_mut().take_records();

    let press = PointerInput::new(PointerButton::Secondary, 20.0, 30.0);
    assert_eq!(host.handle_input(id, &RawInput::PointerDown(press)), 2);
    host.handle_input(id, &RawInput::PointerUp(PointerButton::Secondary));
    let key = KeyDown::text("w").with_modifiers(Modifiers::CONTROL);
    host.handle_input(id, &RawInput::KeyDown(key));
    host.handle_input(id, &RawInput::KeyDown(KeyDown::text("3")));
    host.handle_input(id, &RawInput::KeyUp);

    assert_eq!(
        host.engine().records(),
        &[
            EngineRecord::MouseOption(true),
            EngineRecord::Mouse {
                x: 20.0,
                y: 70.0,
                identity: Identity::TERRAIN
            },
            EngineRecord::MouseUp,
            EngineRecord::Key {
                code: 2048 + 119,
                identity: Identity::TERRAIN
            },
            EngineRecord::KeyUp,
        ]
    );
}

#[test]
fn rename_before_start_changes_identity() {
    let mut host = host(RecordingEngine::new());
    let id = host.open_surface(None, SurfaceFrame::default());
    assert_eq!(
        host.rename_surface(id, Some("Control")),
        Some(Ok(Identity::CONTROL))
    );
    host.start(id);
    assert!(matches!(host.rename_surface(id, None), Some(Err(_))));
    assert_eq!(
        host.surface(id).map(|s| s.identity()),
        Some(Identity::CONTROL)
    );
}

#[test]
fn pass_through_commands() {
    let mut host = host(
        RecordingEngine::new()
            .with_menu_reply(Some(1))
            .with_max_fps(50)
            .with_file_acceptance(false),
    );
    assert_eq!(host.menu(MenuCommand::Weather), Some(1));
    assert!(!host.open_file(&PathBuf::from("war.json"), false));
    host.save_file(&PathBuf::from("out.json"));
    host.debug_script(&PathBuf::from("brain.txt"));
    host.about();
    host.new_simulation();
    assert_eq!(host.preferred_interval(), Some(Duration::from_millis(20)));

    let records = host.engine().records();
    assert_eq!(records[0], EngineRecord::Menu(MenuCommand::Weather));
    assert_eq!(
        records[1],
        EngineRecord::OpenFile {
            path: PathBuf::from("war.json"),
            is_script: false
        }
    );
    assert_eq!(records[2], EngineRecord::SaveFile(PathBuf::from("out.json")));
    assert_eq!(
        records[3],
        EngineRecord::DebugScript(PathBuf::from("brain.txt"))
    );
    assert_eq!(records[4], EngineRecord::About);
    assert!(matches!(records[5], EngineRecord::NewSimulation(_)));
}

#[test]
fn unthrottled_engine_has_no_interval() {
    let host = host(RecordingEngine::new().with_max_fps(0));
    assert_eq!(host.preferred_interval(), None);
}
