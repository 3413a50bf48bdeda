use protoros_core::{Bound, Repetition, ScalarType, TypeRef};
use protoros_rosmsg::parse;

// ── fields ─────────────────────────────────────────────────────────────────────

#[test]
fn parse_basic_primitives() {
    let msg = r#"
int32 x
float64 y
string name
"#;
    let file = parse(msg, "test_msgs/msg/Basic.msg").unwrap();
    let message = &file.messages[0];
    assert_eq!(message.name, "Basic");
    assert_eq!(file.package, vec!["test_msgs"]);
    assert_eq!(message.fields.len(), 3);
    assert_eq!(message.fields[1].ty, TypeRef::Scalar(ScalarType::Float64));
}

#[test]
fn parse_all_scalar_keywords() {
    let msg = r#"
bool a
byte b
char c
int8 d
uint8 e
int16 f
uint16 g
int32 h
uint32 i
int64 j
uint64 k
float32 l
float64 m
string n
wstring o
"#;
    let file = parse(msg, "test_msgs/Scalars.msg").unwrap();
    let fields = &file.messages[0].fields;
    assert_eq!(fields.len(), 15);
    assert!(fields.iter().all(|f| matches!(f.ty, TypeRef::Scalar(_))));
    assert_eq!(fields[1].ty, TypeRef::Scalar(ScalarType::Byte));
    assert_eq!(fields[14].ty, TypeRef::Scalar(ScalarType::WString));
}

/// Every array suffix folds into `repeated`; bounds are kept for loss reporting.
#[test]
fn parse_array_suffixes() {
    let msg = r#"
float64[] data
float64[3] position
float64[<=10] samples
"#;
    let file = parse(msg, "test_msgs/Arrays.msg").unwrap();
    let fields = &file.messages[0].fields;
    assert!(fields.iter().all(|f| f.repetition == Repetition::Repeated));
    assert!(fields[0].bounds.is_empty());
    assert_eq!(fields[1].bounds, vec![Bound::FixedArray(3)]);
    assert_eq!(fields[2].bounds, vec![Bound::BoundedArray(10)]);
}

#[test]
fn parse_bounded_string() {
    let file = parse("string<=20 name\nstring<=5[<=3] tags", "test_msgs/Names.msg").unwrap();
    let fields = &file.messages[0].fields;
    assert_eq!(fields[0].ty, TypeRef::Scalar(ScalarType::String));
    assert_eq!(fields[0].bounds, vec![Bound::BoundedString(20)]);
    assert_eq!(
        fields[1].bounds,
        vec![Bound::BoundedString(5), Bound::BoundedArray(3)]
    );
}

#[test]
fn parse_message_references_stay_unresolved() {
    let msg = r#"
geometry_msgs/Point position
geometry_msgs/msg/Quaternion orientation
Pose[] poses
"#;
    let file = parse(msg, "test_msgs/Nested.msg").unwrap();
    let types: Vec<_> = file.messages[0].fields.iter().map(|f| f.ty.clone()).collect();
    assert_eq!(
        types,
        vec![
            TypeRef::Named("geometry_msgs/Point".into()),
            TypeRef::Named("geometry_msgs/msg/Quaternion".into()),
            TypeRef::Named("Pose".into()),
        ]
    );
}

#[test]
fn parse_default_values() {
    let msg = r#"
int32 retries 3
float64[] gains [1.0, 2.5]
string label "none" # trailing
"#;
    let file = parse(msg, "test_msgs/Defaults.msg").unwrap();
    let fields = &file.messages[0].fields;
    assert_eq!(fields[0].default.as_deref(), Some("3"));
    assert_eq!(fields[1].default.as_deref(), Some("[1.0, 2.5]"));
    assert_eq!(fields[2].default.as_deref(), Some("\"none\""));
    assert_eq!(fields[2].comments, vec!["trailing"]);
}

// ── constants ──────────────────────────────────────────────────────────────────

#[test]
fn parse_constants() {
    let msg = r#"
int32 STATUS_OK=0
int32 STATUS_ERR = -1
string MODE="auto"
"#;
    let file = parse(msg, "test_msgs/Const.msg").unwrap();
    let message = &file.messages[0];
    assert!(message.fields.is_empty());
    let constants: Vec<_> = message
        .constants
        .iter()
        .map(|c| (c.name.as_str(), c.value.as_str()))
        .collect();
    assert_eq!(
        constants,
        vec![("STATUS_OK", "0"), ("STATUS_ERR", "-1"), ("MODE", "\"auto\"")]
    );
}

/// A constant is anchored to the field declared after it, if any.
#[test]
fn constants_are_anchored_to_next_field() {
    let msg = "float32 x\nuint8 MODE_A=1\nuint8 mode\nint32 COUNT=5\n";
    let file = parse(msg, "test_msgs/Anchors.msg").unwrap();
    let constants = &file.messages[0].constants;
    assert_eq!(constants[0].anchor, Some(1));
    assert_eq!(constants[1].anchor, None);
}

// ── comments ───────────────────────────────────────────────────────────────────

#[test]
fn header_comment_documents_the_message() {
    let msg = r#"# A 2D pose.
# Angles in radians.

# Position along x.
float64 x
float64 theta # heading
"#;
    let file = parse(msg, "test_msgs/Pose2D.msg").unwrap();
    let message = &file.messages[0];
    assert_eq!(message.comments, vec!["A 2D pose.", "Angles in radians."]);
    assert_eq!(message.fields[0].comments, vec!["Position along x."]);
    assert_eq!(message.fields[1].comments, vec!["heading"]);
}

#[test]
fn comment_block_without_blank_line_documents_first_field() {
    let file = parse("## count of items\nint32 count", "test_msgs/Count.msg").unwrap();
    let message = &file.messages[0];
    assert!(message.comments.is_empty());
    assert_eq!(message.fields[0].comments, vec!["count of items"]);
}

#[test]
fn crlf_and_indentation_are_accepted() {
    let file = parse("  int32 a\r\n\tint32 b\r\n", "test_msgs/Crlf.msg").unwrap();
    assert_eq!(file.messages[0].fields.len(), 2);
}

// ── errors ─────────────────────────────────────────────────────────────────────

#[test]
fn malformed_line_reports_position() {
    let msg = "int32 ok\nint32\n";
    let err = parse(msg, "test_msgs/Bad.msg").unwrap_err();
    assert_eq!(err.file, "test_msgs/Bad.msg");
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 6);
    assert_eq!(err.text, "int32");
}

#[test]
fn constant_with_message_type_is_rejected() {
    let err = parse("Pose ORIGIN=1", "test_msgs/Bad.msg").unwrap_err();
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 12);
    assert!(err.reason.contains("scalar"), "unexpected reason: {}", err.reason);
}

#[test]
fn duplicate_field_is_rejected() {
    let err = parse("int32 x\nfloat64 x", "test_msgs/Dup.msg").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.reason.contains("duplicate"));
}

#[test]
fn duplicate_name_points_at_the_name() {
    let err = parse("int32 int\nint32 int", "test_msgs/Dup.msg").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 7);

    let err = parse("uint8 A=1\n  uint8 A=2", "test_msgs/Dup.msg").unwrap_err();
    assert_eq!(err.column, 9);
}

#[test]
fn invalid_message_name_is_rejected() {
    let err = parse("int32 x", "test_msgs/my-type.msg").unwrap_err();
    assert_eq!(err.line, 0);
    assert!(err.to_string().contains("not a valid message name"));
}

#[test]
fn first_error_aborts_the_file() {
    let err = parse("int32 a\n???\nint32\n", "test_msgs/Bad.msg").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 1);
    assert_eq!(err.text, "???");
}
