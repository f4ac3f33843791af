use super::*;
use crate::compile::build_knob_table;
use crate::encode::{RecordingSink, SinkEvent};
use crate::foundation::core::Axis;
use crate::render::{ScanlineRasterizer, Shading};
use crate::script::{Constants, Symbol};

#[derive(Default)]
struct CallLog {
    polygons: Vec<(Vec<DVec3>, Constants)>,
    lines: Vec<(Vec<DVec3>, Rgb8)>,
}

impl Rasterizer for CallLog {
    fn draw_polygons(
        &mut self,
        polygons: &GeometryBuffer,
        _target: &mut FrameTarget,
        _shading: &Shading,
        material: &Constants,
    ) -> ReelResult<()> {
        self.polygons.push((polygons.points().to_vec(), *material));
        Ok(())
    }

    fn draw_lines(
        &mut self,
        edges: &GeometryBuffer,
        _target: &mut FrameTarget,
        color: Rgb8,
    ) -> ReelResult<()> {
        self.lines.push((edges.points().to_vec(), color));
        Ok(())
    }
}

fn settings() -> RenderSettings {
    RenderSettings {
        width: 16,
        height: 16,
        subdivisions: 4,
        ..RenderSettings::default()
    }
}

fn static_plan() -> AnimationPlan {
    AnimationPlan {
        basename: String::new(),
        num_frames: 1,
        notices: Vec::new(),
    }
}

fn symbols_with(knob: &str, value: f64) -> SymbolTable {
    let mut s = SymbolTable::new();
    s.insert(DEFAULT_MATERIAL, Symbol::Constants(Constants::default()));
    s.insert(knob, Symbol::Knob { value });
    s
}

fn unit_box() -> Command {
    Command::new(Op::Box {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        width: 1.0,
        height: 1.0,
        depth: 1.0,
    })
}

struct Harness {
    settings: RenderSettings,
    plan: AnimationPlan,
    knobs: KnobTable,
}

impl Harness {
    fn new() -> Self {
        Self {
            settings: settings(),
            plan: static_plan(),
            knobs: KnobTable::empty(1).unwrap(),
        }
    }

    fn run(
        &self,
        commands: &[Command],
        symbols: &SymbolTable,
        log: &mut CallLog,
    ) -> ReelResult<RenderContext> {
        let interp = FrameInterpreter::new(commands, &self.settings, &self.plan, &self.knobs);
        let mut ctx = RenderContext::new(self.settings.canvas()?, Rgb8::black());
        let mut sink = RecordingSink::new();
        for cmd in commands {
            interp.execute(cmd, &mut ctx, symbols, &mut *log, &mut sink)?;
        }
        Ok(ctx)
    }
}

#[test]
fn knob_scales_move_displacement() {
    let h = Harness::new();
    let cmds = vec![
        Command::new(Op::Move {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        })
        .with_knob("slide"),
    ];
    let ctx = h
        .run(&cmds, &symbols_with("slide", 2.0), &mut CallLog::default())
        .unwrap();
    assert_eq!(*ctx.stack.top(), math::translate(2.0, 0.0, 0.0));
}

#[test]
fn knob_scales_scale_factors_and_rotation_angle() {
    let h = Harness::new();
    let cmds = vec![
        Command::new(Op::Scale {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        })
        .with_knob("k"),
        Command::new(Op::Rotate {
            axis: Axis::Z,
            degrees: 45.0,
        })
        .with_knob("k"),
    ];
    let ctx = h
        .run(&cmds, &symbols_with("k", 2.0), &mut CallLog::default())
        .unwrap();
    let expected = math::compose(
        &math::scale(2.0, 4.0, 6.0),
        &math::rotate(Axis::Z, std::f64::consts::FRAC_PI_2),
    );
    assert!(ctx.stack.top().abs_diff_eq(expected, 1e-12));
}

#[test]
fn transforms_without_knob_use_literal_values() {
    let h = Harness::new();
    let cmds = vec![Command::new(Op::Rotate {
        axis: Axis::X,
        degrees: 90.0,
    })];
    let ctx = h
        .run(&cmds, &symbols_with("unused", 5.0), &mut CallLog::default())
        .unwrap();
    assert!(
        ctx.stack
            .top()
            .abs_diff_eq(math::rotate(Axis::X, std::f64::consts::FRAC_PI_2), 1e-12)
    );
}

#[test]
fn push_move_pop_isolates_the_move() {
    let h = Harness::new();
    let cmds = vec![
        Command::new(Op::Scale {
            x: 2.0,
            y: 2.0,
            z: 2.0,
        }),
        Command::new(Op::Push),
        Command::new(Op::Move {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        }),
        Command::new(Op::Pop),
    ];
    let ctx = h
        .run(&cmds, &symbols_with("k", 1.0), &mut CallLog::default())
        .unwrap();
    assert_eq!(*ctx.stack.top(), math::scale(2.0, 2.0, 2.0));
    assert_eq!(ctx.stack.depth(), 1);
}

#[test]
fn popping_the_base_frame_fails() {
    let h = Harness::new();
    let err = h
        .run(
            &[Command::new(Op::Pop)],
            &symbols_with("k", 1.0),
            &mut CallLog::default(),
        )
        .unwrap_err();
    assert!(matches!(err, ReelError::Evaluation(_)));
}

#[test]
fn shapes_are_transformed_by_current_top() {
    let h = Harness::new();
    let cmds = vec![
        Command::new(Op::Move {
            x: 10.0,
            y: 0.0,
            z: 0.0,
        }),
        unit_box(),
    ];
    let mut log = CallLog::default();
    let ctx = h.run(&cmds, &symbols_with("k", 1.0), &mut log).unwrap();

    let mut expected = GeometryBuffer::new();
    expected.add_box(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
    expected.transform(&math::translate(10.0, 0.0, 0.0));

    assert_eq!(log.polygons.len(), 1);
    assert_eq!(log.polygons[0].0, expected.points());
    assert!(ctx.scratch.is_empty());
    // Shapes never modify the stack.
    assert_eq!(*ctx.stack.top(), math::translate(10.0, 0.0, 0.0));
}

#[test]
fn material_defaults_to_neutral_and_resets_per_shape() {
    let h = Harness::new();
    let shiny = Constants::uniform(0.9, 0.9, 0.9);
    let mut symbols = symbols_with("k", 1.0);
    symbols.insert("shiny", Symbol::Constants(shiny));

    let cmds = vec![unit_box().with_constants("shiny"), unit_box()];
    let mut log = CallLog::default();
    h.run(&cmds, &symbols, &mut log).unwrap();
    assert_eq!(log.polygons[0].1, shiny);
    assert_eq!(log.polygons[1].1, Constants::default());
}

#[test]
fn unknown_material_fails_and_clears_scratch() {
    let h = Harness::new();
    let interp = FrameInterpreter::new(&[], &h.settings, &h.plan, &h.knobs);
    let mut ctx = RenderContext::new(h.settings.canvas().unwrap(), Rgb8::black());
    let err = interp
        .execute(
            &unit_box().with_constants("missing"),
            &mut ctx,
            &symbols_with("k", 1.0),
            &mut CallLog::default(),
            &mut RecordingSink::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ReelError::Evaluation(_)));
    assert!(ctx.scratch.is_empty());
}

#[test]
fn unknown_knob_reference_fails() {
    let h = Harness::new();
    let cmds = vec![
        Command::new(Op::Move {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        })
        .with_knob("ghost"),
    ];
    let err = h
        .run(&cmds, &symbols_with("k", 1.0), &mut CallLog::default())
        .unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn lines_use_line_color_and_current_transform() {
    let h = Harness::new();
    let cmds = vec![
        Command::new(Op::Move {
            x: 0.0,
            y: 5.0,
            z: 0.0,
        }),
        Command::new(Op::Line {
            from: [0.0, 0.0, 0.0],
            to: [1.0, 0.0, 0.0],
        }),
    ];
    let mut log = CallLog::default();
    h.run(&cmds, &symbols_with("k", 1.0), &mut log).unwrap();
    assert_eq!(
        log.lines,
        vec![(
            vec![DVec3::new(0.0, 5.0, 0.0), DVec3::new(1.0, 5.0, 0.0)],
            h.settings.line_color
        )]
    );
}

#[test]
fn static_frame_honors_display_and_save() {
    let h = Harness::new();
    let cmds = vec![
        unit_box(),
        Command::new(Op::Display),
        Command::new(Op::Save {
            path: "out.png".to_string(),
        }),
    ];
    let interp = FrameInterpreter::new(&cmds, &h.settings, &h.plan, &h.knobs);
    let mut symbols = symbols_with("k", 1.0);
    let mut sink = RecordingSink::new();
    let out = interp
        .render_frame(
            FrameIndex(0),
            &mut symbols,
            &mut ScanlineRasterizer,
            &mut sink,
        )
        .unwrap();
    assert_eq!(out.saved_to, None);
    assert_eq!(
        sink.events(),
        &[SinkEvent::Display, SinkEvent::Save(PathBuf::from("out.png"))]
    );
    assert_eq!(out.image.dimensions(), (16, 16));
}

#[test]
fn animated_frame_binds_knobs_and_saves_numbered_file() {
    let cmds = vec![
        Command::new(Op::Frames { count: 3 }),
        Command::new(Op::Vary {
            start_frame: 0,
            end_frame: 2,
            start_value: 0.0,
            end_value: 1.0,
        })
        .with_knob("k"),
        Command::new(Op::Move {
            x: 4.0,
            y: 0.0,
            z: 0.0,
        })
        .with_knob("k"),
        Command::new(Op::Display),
        Command::new(Op::Save {
            path: "ignored.png".to_string(),
        }),
    ];
    let settings = settings();
    let plan = AnimationPlan {
        basename: "slide".to_string(),
        num_frames: 3,
        notices: Vec::new(),
    };
    let knobs = build_knob_table(&cmds, 3, &mut Vec::new()).unwrap();
    let interp = FrameInterpreter::new(&cmds, &settings, &plan, &knobs);

    let mut symbols = symbols_with("k", 0.0);
    let mut sink = RecordingSink::new();
    let out = interp
        .render_frame(FrameIndex(2), &mut symbols, &mut CallLog::default(), &mut sink)
        .unwrap();

    assert_eq!(symbols.knob("k").unwrap(), 1.0);
    let expected = PathBuf::from("anim/slide002.png");
    assert_eq!(out.saved_to.as_deref(), Some(expected.as_path()));
    assert_eq!(sink.events(), &[SinkEvent::Frame(FrameIndex(2), expected)]);
}

#[test]
fn each_frame_starts_from_identity() {
    let cmds = vec![
        Command::new(Op::Move {
            x: 3.0,
            y: 0.0,
            z: 0.0,
        }),
        Command::new(Op::Line {
            from: [0.0, 0.0, 0.0],
            to: [0.0, 1.0, 0.0],
        }),
    ];
    let h = Harness::new();
    let interp = FrameInterpreter::new(&cmds, &h.settings, &h.plan, &h.knobs);
    let mut symbols = symbols_with("k", 1.0);
    let mut log = CallLog::default();
    for _ in 0..2 {
        interp
            .render_frame(
                FrameIndex(0),
                &mut symbols,
                &mut log,
                &mut RecordingSink::new(),
            )
            .unwrap();
    }
    assert_eq!(log.lines.len(), 2);
    assert_eq!(log.lines[0], log.lines[1]);
    assert_eq!(log.lines[0].0[0], DVec3::new(3.0, 0.0, 0.0));
}
