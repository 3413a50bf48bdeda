use protoros::{
    BatchError, MsgSource, translate_msg_batch,
    core::{LossKind, TranslateError},
};

fn sources(files: &[(&str, &str)]) -> Vec<MsgSource> {
    files.iter().map(|(name, text)| MsgSource::new(*name, *text)).collect()
}

// ── resolution across the batch ────────────────────────────────────────────────

#[test]
fn sibling_reference_resolves() {
    let batch = translate_msg_batch(
        &sources(&[
            ("nav/Path.msg", "Pose[] poses\n"),
            ("nav/Pose.msg", "float64 x\nfloat64 y\n"),
        ]),
        None,
    );

    assert!(batch.is_success());
    let names: Vec<&str> = batch.outputs().map(|o| o.file_name.as_str()).collect();
    assert_eq!(names, vec!["nav/path.proto", "nav/pose.proto"]);

    let path = batch.outputs().next().unwrap();
    assert!(path.text.contains("import \"nav/pose.proto\";\n"));
    assert!(path.text.contains("  repeated Pose poses = 1;\n"));
}

#[test]
fn missing_sibling_is_unresolved() {
    let batch = translate_msg_batch(&sources(&[("nav/Path.msg", "Pose[] poses\n")]), None);

    let failures: Vec<_> = batch.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "nav/Path.msg");
    match failures[0].1 {
        BatchError::Translate(TranslateError::Unresolved(e)) => {
            assert_eq!(e.name, "Pose");
            assert_eq!(e.field, "poses");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn colliding_definitions_are_ambiguous_for_referrers() {
    let batch = translate_msg_batch(
        &sources(&[
            ("a/nav/Pose.msg", "float64 x\n"),
            ("b/nav/Pose.msg", "float64 y\n"),
            ("nav/Path.msg", "Pose[] poses\n"),
        ]),
        None,
    );

    assert!(batch.results[0].result.is_ok());
    assert!(batch.results[1].result.is_ok());
    assert!(matches!(
        batch.results[2].result,
        Err(BatchError::Translate(TranslateError::Ambiguous(_)))
    ));
}

// ── batch behaviour ────────────────────────────────────────────────────────────

#[test]
fn parse_error_does_not_stop_siblings() {
    let batch = translate_msg_batch(
        &sources(&[
            ("demo/Good.msg", "bool ok\n"),
            ("demo/Bad.msg", "int32 a\n???\n"),
            ("demo/Other.msg", "string name\n"),
        ]),
        None,
    );

    assert!(!batch.is_success());
    assert!(batch.results[0].result.is_ok());
    match &batch.results[1].result {
        Err(BatchError::Translate(TranslateError::Parse(e))) => assert_eq!(e.line, 2),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(batch.results[2].result.is_ok());
}

#[test]
fn results_follow_input_order() {
    let names: Vec<String> = (0..32).map(|i| format!("demo/M{i}.msg")).collect();
    let input: Vec<MsgSource> = names.iter().map(|n| MsgSource::new(n.clone(), "int32 v\n")).collect();

    let batch = translate_msg_batch(&input, None);
    let sources: Vec<&str> = batch.results.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, names.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn package_override_replaces_directory_package() {
    let batch = translate_msg_batch(&sources(&[("msgs/Point.msg", "float32 x\n")]), Some("robot.geometry"));

    let out = batch.outputs().next().unwrap();
    assert_eq!(out.file_name, "robot/geometry/point.proto");
    assert!(out.text.contains("package robot.geometry;\n"));
}

// ── rendered output ────────────────────────────────────────────────────────────

#[test]
fn constant_becomes_comment_not_field() {
    let batch = translate_msg_batch(
        &sources(&[("demo/Point.msg", "float32 x\nfloat32 y\nint32 COUNT=5\n")]),
        None,
    );

    let out = batch.outputs().next().unwrap();
    assert!(out.text.contains("// COUNT = 5\nmessage Point {\n  float x = 1;\n  float y = 2;\n}\n"));
    assert!(!out.text.contains("int32 COUNT"));
    assert_eq!(out.losses.len(), 1);
    assert_eq!(out.losses[0].kind, LossKind::ConstantAsComment);
}

#[test]
fn losses_are_reported_per_field() {
    let batch = translate_msg_batch(
        &sources(&[("demo/Scan.msg", "uint8[4] flags\nstring<=8 label\nint16 gain 3\n")]),
        None,
    );

    let kinds: Vec<LossKind> = batch.outputs().next().unwrap().losses.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LossKind::ScalarWidened,
            LossKind::BoundDiscarded,
            LossKind::BoundDiscarded,
            LossKind::ScalarWidened,
            LossKind::DefaultDropped,
        ]
    );
}
