use std::path::Path;
use std::time::Duration;

use vr_locomotion_bridge_lib::config::poller_config::PollerConfig;
use vr_locomotion_bridge_lib::core::ControlMode;
use vr_locomotion_bridge_lib::core::actions::ActionBindings;
use vr_locomotion_bridge_lib::core::runtime::script::ScriptedRuntime;
use vr_locomotion_bridge_lib::mapping::command::CommandWriter;
use vr_locomotion_bridge_lib::mapping::poller::Poller;
use vr_locomotion_bridge_lib::mapping::translator::Translator;

const TOGGLE: &str = r#""/actions/default/in/ToggleControl": {"digital": true}"#;
const SNAP_LEFT: &str = r#""/actions/control/in/SnapTurnLeft": {"digital": true}"#;
const SNAP_RIGHT: &str = r#""/actions/control/in/SnapTurnRight": {"digital": true}"#;

fn speed1(x: f32) -> String {
    format!(r#""/actions/control/in/SpeedVector1": {{"analog": {{"x": {x}}}}}"#)
}

fn speed2(x: f32, y: f32) -> String {
    format!(r#""/actions/control/in/SpeedVector2": {{"analog": {{"x": {x}, "y": {y}}}}}"#)
}

fn direction(x: f32, y: f32) -> String {
    format!(r#""/actions/control/in/Direction": {{"analog": {{"x": {x}, "y": {y}}}}}"#)
}

fn frame(samples: &[&str]) -> String {
    format!("{{{}}}", samples.join(", "))
}

/// Runs every frame of the script and returns what went to the output.
fn run_script(frames: &[String], config: &PollerConfig) -> (String, ControlMode) {
    let script = frames.join("\n");
    let mut runtime = ScriptedRuntime::from_reader(script.as_bytes()).expect("valid script");
    let bindings = ActionBindings::register(&mut runtime, Path::new("actions.json"));
    let translator = Translator::new(bindings, config);
    let mut poller = Poller::new(
        runtime,
        translator,
        CommandWriter::new(Vec::new()),
        Duration::ZERO,
    );

    let ticks = poller.run(Some(frames.len() as u64)).expect("in-memory writes");
    assert_eq!(ticks, frames.len() as u64);

    let mode = poller.translator().mode();
    let (_, _, writer) = poller.into_parts();
    (String::from_utf8(writer.into_inner()).unwrap(), mode)
}

#[test]
fn trigger_speed_forward_emits_single_move() {
    let frames = vec![frame(&[&speed1(0.3), &speed2(0.0, 0.0), &direction(0.0, 1.0)])];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 0.3 0\n");
}

#[test]
fn unchanged_motion_is_suppressed() {
    let moving = frame(&[&speed1(0.5), &direction(1.0, 0.0)]);
    let frames = vec![moving.clone(), moving.clone(), moving, frame(&[])];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 0.5 90\nmove 0 0\n");
}

#[test]
fn always_emit_repeats_every_tick() {
    let config = PollerConfig {
        suppress_duplicate_moves: false,
        ..PollerConfig::default()
    };
    let frames = vec![frame(&[]), frame(&[]), frame(&[])];

    let (out, _) = run_script(&frames, &config);

    assert_eq!(out, "move 0 0\nmove 0 0\nmove 0 0\n");
}

#[test]
fn stick_speed_is_clamped_and_combined_with_trigger() {
    let frames = vec![
        frame(&[&speed2(1.0, 1.0)]),
        frame(&[&speed1(0.25), &speed2(0.0, -0.5)]),
        frame(&[&speed1(0.75), &speed2(0.0, -0.5)]),
    ];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 1 0\nmove 0.5 0\nmove 0.75 0\n");
}

#[test]
fn snap_turn_follows_move_when_standing_still() {
    let frames = vec![frame(&[SNAP_LEFT])];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 0 0\nsnapturn left\n");
}

#[test]
fn snap_turn_alone_when_move_is_suppressed() {
    let frames = vec![frame(&[]), frame(&[SNAP_RIGHT]), frame(&[SNAP_RIGHT])];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    // held button does not repeat
    assert_eq!(out, "move 0 0\nsnapturn right\n");
}

#[test]
fn snap_turn_never_fires_while_moving() {
    let frames = vec![
        frame(&[&speed1(0.1), SNAP_LEFT, SNAP_RIGHT]),
        frame(&[&speed1(0.1)]),
    ];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 0.1 0\n");
}

#[test]
fn toggle_round_trip_silences_default_mode() {
    let frames = vec![
        frame(&[TOGGLE, &speed1(0.4)]),
        frame(&[&speed1(0.4)]),
        frame(&[&speed1(0.4)]),
        frame(&[TOGGLE, &speed1(0.4)]),
        frame(&[&speed1(0.4)]),
    ];

    let (out, mode) = run_script(&frames, &PollerConfig::default());

    // the first toggle switches to Default, the tick after the second toggle emits again
    assert_eq!(out, "move 0.4 0\n");
    assert_eq!(mode, ControlMode::Control);
}

#[test]
fn toggle_tick_produces_no_output_even_with_snap_turn() {
    let frames = vec![frame(&[TOGGLE, SNAP_LEFT])];

    let (out, mode) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "");
    assert_eq!(mode, ControlMode::Default);
}

#[test]
fn starting_in_default_mode_waits_for_toggle() {
    let config = PollerConfig {
        initial_mode: ControlMode::Default,
        ..PollerConfig::default()
    };
    let frames = vec![
        frame(&[&speed1(0.9)]),
        frame(&[TOGGLE, &speed1(0.9)]),
        frame(&[&speed1(0.9), &direction(-1.0, 0.0)]),
    ];

    let (out, mode) = run_script(&frames, &config);

    assert_eq!(out, "move 0.9 -90\n");
    assert_eq!(mode, ControlMode::Control);
}

#[test]
fn always_activate_control_set_does_not_emit_in_default_mode() {
    let config = PollerConfig {
        initial_mode: ControlMode::Default,
        always_activate_control_set: true,
        ..PollerConfig::default()
    };
    let frames = vec![frame(&[&speed1(0.9), SNAP_LEFT])];

    let (out, mode) = run_script(&frames, &config);

    assert_eq!(out, "");
    assert_eq!(mode, ControlMode::Default);
}

#[test]
fn backward_direction_reads_180_degrees() {
    let frames = vec![frame(&[&speed1(1.0), &direction(0.0, -1.0)])];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 1 180\n");
}

#[test]
fn exhausted_script_reads_idle() {
    let frames = vec![frame(&[&speed1(0.6)])];
    let mut runtime = ScriptedRuntime::from_reader(frames.join("\n").as_bytes()).unwrap();
    let bindings = ActionBindings::resolve(&mut runtime);
    let translator = Translator::new(bindings, &PollerConfig::default());
    let mut poller = Poller::new(
        runtime,
        translator,
        CommandWriter::new(Vec::new()),
        Duration::ZERO,
    );

    poller.run(Some(3)).unwrap();

    assert_eq!(poller.runtime().remaining_frames(), 0);
    let out = String::from_utf8(poller.writer().get_ref().clone()).unwrap();
    assert_eq!(out, "move 0.6 0\nmove 0 0\n");
}

#[test]
fn move_after_idle_tick_reports_new_speed() {
    let frames = vec![
        frame(&[]),
        frame(&[&speed1(0.3), &speed2(0.0, 0.0), &direction(0.0, 1.0)]),
    ];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 0 0\nmove 0.3 0\n");
}

#[test]
fn direction_change_alone_emits_move() {
    let frames = vec![
        frame(&[&speed1(0.5), &direction(0.0, 1.0)]),
        frame(&[&speed1(0.5), &direction(1.0, 0.0)]),
    ];

    let (out, _) = run_script(&frames, &PollerConfig::default());

    assert_eq!(out, "move 0.5 0\nmove 0.5 90\n");
}
