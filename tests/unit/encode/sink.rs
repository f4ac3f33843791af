use super::*;

#[test]
fn recording_sink_keeps_call_order() {
    let img = RgbImage::new(2, 2);
    let mut sink = RecordingSink::new();
    sink.save_frame(FrameIndex(0), &img, Path::new("anim/a000.png"))
        .unwrap();
    sink.save_frame(FrameIndex(1), &img, Path::new("anim/a001.png"))
        .unwrap();
    sink.assemble_animation("a").unwrap();
    sink.display(&img).unwrap();
    sink.save(&img, Path::new("out.png")).unwrap();

    assert_eq!(
        sink.events(),
        &[
            SinkEvent::Frame(FrameIndex(0), PathBuf::from("anim/a000.png")),
            SinkEvent::Frame(FrameIndex(1), PathBuf::from("anim/a001.png")),
            SinkEvent::Assemble("a".to_string()),
            SinkEvent::Display,
            SinkEvent::Save(PathBuf::from("out.png")),
        ]
    );
    assert_eq!(sink.images().len(), 4);
}
