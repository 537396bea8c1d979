//! The sandbox engine driven through the real host.

use pretty_assertions::assert_eq;
use simhost_core::{
    CycleState, Engine, Identity, KeyDown, PointerButton, PointerInput, RawInput, Seed,
    SurfaceFrame, SurfaceSize,
};
use simhost_render::{Canvas, CompositeOutcome};
use simhost_runtime::{ExitCode, Flow, Host, HostConfig, ManualClock, RecordingExit};
use simhost_sandbox::{Conditions, Sandbox};

type SandboxHost = Host<Sandbox, RecordingExit, ManualClock>;

const SIZE: SurfaceSize = SurfaceSize::new(1024, 768);

fn host(conditions: Conditions) -> SandboxHost {
    Host::with_parts(
        Sandbox::new(conditions),
        HostConfig::new().with_seed(3),
        RecordingExit::default(),
        ManualClock::new(0),
    )
}

/// Stock battle with nobody able to move or shoot.
fn frozen() -> Conditions {
    let mut conditions = Conditions::default();
    for kind in &mut conditions.unit_types {
        kind.speed_maximum = 0;
    }
    for unit in &mut conditions.units {
        unit.missile_number = 0;
    }
    conditions
}

#[test]
fn frames_show_both_sides() {
    let mut host = host(Conditions::default());
    let id = host.open_surface(Some("Terrain"), SurfaceFrame::from_size(1024.0, 768.0));
    assert_eq!(host.start(id), Flow::Continue);
    assert_eq!(host.surface(id).map(|s| s.identity()), Some(Identity::TERRAIN));

    let mut buf = vec![0u32; SIZE.area() as usize];
    let mut canvas = Canvas::new(&mut buf, SIZE, 0).expect("canvas");
    let report = host.redraw(id, SIZE, &mut canvas);
    assert_eq!(report.composite, Some(CompositeOutcome::Drawn(SIZE)));

    let battle = host.engine().battle().expect("battle");
    for unit in battle.units() {
        let c = unit.combatants.iter().find(|c| c.is_alive()).expect("alive");
        let expected = if unit.alignment == 0 { 0x004C_4C99 } else { 0x0099_4C4C };
        assert_eq!(canvas.pixel(c.x as u32, c.y as u32), Some(expected));
    }
}

#[test]
fn stalemate_quits_with_success() {
    let mut host = host(frozen());
    let id = host.open_surface(None, SurfaceFrame::from_size(64.0, 48.0));
    host.start(id);

    let size = SurfaceSize::new(64, 48);
    let mut buf = vec![0u32; size.area() as usize];
    let mut canvas = Canvas::new(&mut buf, size, 0).expect("canvas");
    let mut states = Vec::new();
    while let Some(next) = host.next_redraw() {
        let report = host.redraw(next, size, &mut canvas);
        states.extend(report.state);
        assert!(states.len() < 50, "battle never ended");
    }

    assert_eq!(states.last(), Some(&CycleState::Quit));
    assert_eq!(host.exit().codes(), &[ExitCode::Success]);
    assert!(host.engine().is_closed());
}

#[test]
fn new_key_rebuilds_through_host() {
    let mut host = host(Conditions::default());
    let id = host.open_surface(None, SurfaceFrame::from_size(1024.0, 768.0));
    host.start(id);
    let mut buf = vec![0u32; SIZE.area() as usize];
    let mut canvas = Canvas::new(&mut buf, SIZE, 0).expect("canvas");

    host.redraw(id, SIZE, &mut canvas);
    assert_eq!(host.engine().battle().map(|b| b.ticks()), Some(1));

    host.handle_input(id, &RawInput::KeyDown(KeyDown::text("n")));
    let report = host.redraw(id, SIZE, &mut canvas);
    assert_eq!(report.state, Some(CycleState::NewAgents));
    assert_eq!(host.engine().battle().map(|b| b.ticks()), Some(0));
}

#[test]
fn drag_selects_units_under_rectangle() {
    let mut host = host(frozen());
    let id = host.open_surface(None, SurfaceFrame::from_size(1024.0, 768.0));
    host.start(id);

    // Window coordinates grow upward; board (80..160, 180..220).
    let press = PointerInput::new(PointerButton::Primary, 80.0, 588.0);
    let drag = PointerInput::new(PointerButton::Primary, 160.0, 548.0);
    host.handle_input(id, &RawInput::PointerDown(press));
    host.handle_input(id, &RawInput::PointerDragged(drag));
    host.handle_input(id, &RawInput::PointerUp(PointerButton::Primary));

    let battle = host.engine().battle().expect("battle");
    let selected: Vec<usize> = battle
        .units()
        .iter()
        .enumerate()
        .filter(|(_, u)| u.selected)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(selected, vec![0]);
}

#[test]
fn conditions_survive_save_and_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("battle.json");

    let mut conditions = frozen();
    conditions.units.truncate(6);
    let mut host = host(conditions.clone());
    let id = host.open_surface(None, SurfaceFrame::from_size(10.0, 10.0));
    host.start(id);
    host.save_file(&path);

    let mut other = Sandbox::default();
    other.init(Identity::VIEW, Seed::new(1)).expect("init");
    assert!(other.open_file_name(&path, false));
    assert_eq!(other.conditions().units, conditions.units);
    assert_eq!(other.battle().map(|b| b.units().len()), Some(6));
}

#[test]
fn unreadable_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "not json").expect("write");

    let mut host = host(Conditions::default());
    let id = host.open_surface(None, SurfaceFrame::from_size(10.0, 10.0));
    host.start(id);
    assert!(!host.open_file(&path, false));
    assert_eq!(host.engine().errors().len(), 1);
    assert!(!host.is_terminated());
}
