use super::*;
use crate::encode::{RecordingSink, SinkEvent};
use crate::render::ScanlineRasterizer;
use crate::script::Script;

fn small() -> RenderSettings {
    RenderSettings {
        width: 24,
        height: 24,
        subdivisions: 6,
        ..RenderSettings::default()
    }
}

fn load(json: &str) -> Script {
    Script::from_json_str(json).unwrap()
}

#[test]
fn static_script_renders_one_frame_and_displays_once() {
    let mut script = load(
        r#"{"commands": [
            {"op": "box", "args": [4, 20, 0, 16, 16, 16]},
            {"op": "display"}
        ]}"#,
    );
    let mut sink = RecordingSink::new();
    let summary = run_script(&mut script, &small(), &mut ScanlineRasterizer, &mut sink).unwrap();

    assert_eq!(summary.num_frames, 1);
    assert!(summary.frames.is_empty());
    assert_eq!(sink.events(), &[SinkEvent::Display]);
    // The displayed image already contains the box.
    assert_ne!(sink.images()[0].get_pixel(12, 12), &image::Rgb([0, 0, 0]));
}

#[test]
fn animated_script_saves_frames_then_assembles_once() {
    let mut script = load(
        r#"{"commands": [
            {"op": "frames", "args": [4]},
            {"op": "vary", "args": [0, 3, 0, 3], "knob": "k"},
            {"op": "move", "args": [1, 0, 0], "knob": "k"},
            {"op": "box", "args": [0, 10, 0, 5, 5, 5]}
        ]}"#,
    );
    let mut sink = RecordingSink::new();
    let summary = run_script(&mut script, &small(), &mut ScanlineRasterizer, &mut sink).unwrap();

    assert_eq!(summary.basename, "default");
    assert_eq!(summary.num_frames, 4);
    assert_eq!(summary.frames.len(), 4);
    assert_eq!(summary.notices.len(), 1);

    let events = sink.events();
    assert_eq!(events.len(), 5);
    for (i, e) in events[..4].iter().enumerate() {
        let expected = PathBuf::from(format!("anim/default{i:03}.png"));
        assert_eq!(e, &SinkEvent::Frame(FrameIndex(i), expected));
    }
    assert_eq!(events[4], SinkEvent::Assemble("default".to_string()));
    // Knob state after the run is the last frame's value.
    assert_eq!(script.symbols.knob("k").unwrap(), 3.0);
    // The box moves, so frames differ.
    assert_ne!(sink.images()[0], sink.images()[3]);
}

#[test]
fn fatal_configuration_renders_nothing() {
    let mut script = load(
        r#"{"commands": [
            {"op": "vary", "args": [0, 3, 0, 1], "knob": "k"},
            {"op": "box", "args": [0, 0, 0, 1, 1, 1]},
            {"op": "display"}
        ]}"#,
    );
    let mut sink = RecordingSink::new();
    let err = run_script(&mut script, &small(), &mut ScanlineRasterizer, &mut sink).unwrap_err();
    assert!(matches!(err, crate::ReelError::Animation(_)));
    assert!(sink.events().is_empty());
}

#[test]
fn vary_past_frame_count_renders_nothing() {
    let mut script = load(
        r#"{"commands": [
            {"op": "frames", "args": [3]},
            {"op": "vary", "args": [0, 5, 0, 1], "knob": "k"}
        ]}"#,
    );
    let mut sink = RecordingSink::new();
    assert!(run_script(&mut script, &small(), &mut ScanlineRasterizer, &mut sink).is_err());
    assert!(sink.events().is_empty());
}

#[test]
fn static_run_keeps_declared_knob_values() {
    let mut script = load(
        r#"{
            "symbols": {"k": {"type": "knob", "value": 0.5}},
            "commands": [{"op": "move", "args": [2, 0, 0], "knob": "k"}]
        }"#,
    );
    let mut sink = RecordingSink::new();
    run_script(&mut script, &small(), &mut ScanlineRasterizer, &mut sink).unwrap();
    assert_eq!(script.symbols.knob("k").unwrap(), 0.5);
}

#[test]
fn compile_script_collects_notices_from_both_passes() {
    let script = load(
        r#"{"commands": [
            {"op": "frames", "args": [5]},
            {"op": "vary", "args": [4, 0, 0, 1], "knob": "k"}
        ]}"#,
    );
    let compiled = compile_script(&script).unwrap();
    assert_eq!(compiled.plan.notices.len(), 2);
    assert!(matches!(
        compiled.plan.notices[0],
        Notice::DefaultBasename { .. }
    ));
    assert!(matches!(
        compiled.plan.notices[1],
        Notice::SwappedVaryRange { .. }
    ));
    assert_eq!(compiled.knobs.value(FrameIndex(4), "k"), Some(1.0));
}

#[test]
fn invalid_settings_fail_before_rendering() {
    let mut script = load(r#"{"commands": [{"op": "display"}]}"#);
    let settings = RenderSettings {
        height: 0,
        ..small()
    };
    let mut sink = RecordingSink::new();
    assert!(run_script(&mut script, &settings, &mut ScanlineRasterizer, &mut sink).is_err());
    assert!(sink.events().is_empty());
}

#[test]
fn oversized_frame_count_is_an_error_not_an_allocation() {
    let err = Script::from_json_str(
        r#"{"commands": [
            {"op": "frames", "args": [1e19]},
            {"op": "vary", "args": [0, 1, 0, 1], "knob": "k"}
        ]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, crate::ReelError::Validation(_)), "{err:?}");
    assert!(err.to_string().contains("command 0"));
}

#[test]
fn far_away_line_renders_without_panicking() {
    let mut script = load(
        r#"{"commands": [
            {"op": "scale", "args": [1e18, 1, 1]},
            {"op": "line", "args": [-10, 12, 0, 10, 12, 0]},
            {"op": "display"}
        ]}"#,
    );
    let mut sink = RecordingSink::new();
    run_script(&mut script, &small(), &mut ScanlineRasterizer, &mut sink).unwrap();
    assert_eq!(sink.events(), &[SinkEvent::Display]);
}
