use protoros_core::{
    Constant, EnumType, Field, MessageType, ScalarType, TypeName, TypeRef, WellKnownType,
    enum_to_constants,
};
use protoros_rosmsg::{parse, render_ros};

fn pkg() -> Vec<String> {
    vec!["robot_msgs".to_string()]
}

#[test]
fn field_comment_is_rendered_as_leading_hash_comment() {
    let mut field = Field::new("MyInt", TypeRef::Scalar(ScalarType::Int32));
    field.comments.push("MyInt - Example trailing Comment".to_string());
    let message = MessageType::new("Example").with_field(field);

    let text = render_ros(&message, &pkg()).unwrap();
    assert_eq!(
        text,
        "# This file was generated. DO NOT EDIT!\n\
         \n\
         # Example\n\
         # MyInt - Example trailing Comment\n\
         int32 MyInt\n"
    );
}

#[test]
fn references_are_qualified_outside_own_package() {
    let message = MessageType::new("Robot")
        .with_field(Field::new(
            "wheels",
            TypeRef::Message(TypeName::new(pkg(), vec!["Wheel".into()])),
        ).repeated())
        .with_field(Field::new(
            "origin",
            TypeRef::Message(TypeName::new(vec!["geometry_msgs".into()], vec!["Point".into()])),
        ))
        .with_field(Field::new("stamp", TypeRef::WellKnown(WellKnownType::Timestamp)));

    let text = render_ros(&message, &pkg()).unwrap();
    assert!(text.contains("\nWheel[] wheels\n"), "{text}");
    assert!(text.contains("\ngeometry_msgs/Point origin\n"), "{text}");
    assert!(text.contains("\nbuiltin_interfaces/Time stamp\n"), "{text}");
}

/// Enum groups follow the fields, introduced by a blank line and the enum name.
#[test]
fn enum_constants_are_grouped_after_fields() {
    let mut message = MessageType::new("Robot").with_field({
        let mut f = Field::new("mode", TypeRef::Scalar(ScalarType::UInt8));
        f.comments.push("Mode".to_string());
        f
    });
    let mode = EnumType::new("Mode", &[("IDLE", 0), ("DRIVING", 1)]);
    message.constants = enum_to_constants(&mode, ScalarType::UInt8);

    let text = render_ros(&message, &pkg()).unwrap();
    assert!(
        text.ends_with("# Mode\nuint8 mode\n\n# Mode\nuint8 IDLE=0\nuint8 DRIVING=1\n"),
        "{text}"
    );
}

#[test]
fn rendered_text_parses_back() {
    let mut message = MessageType::new("Sample")
        .with_field(Field::new("flag", TypeRef::Scalar(ScalarType::Bool)))
        .with_field(Field::new("values", TypeRef::Scalar(ScalarType::Float32)).repeated());
    message.constants.push(Constant::new("LIMIT", ScalarType::Int32, "4"));

    let text = render_ros(&message, &pkg()).unwrap();
    let file = parse(&text, "robot_msgs/Sample.msg").unwrap();
    let back = &file.messages[0];
    assert_eq!(back.fields.len(), 2);
    assert_eq!(back.fields[1].ty, TypeRef::Scalar(ScalarType::Float32));
    assert!(back.fields[1].is_repeated());
    assert_eq!(back.constants[0].name, "LIMIT");
    assert_eq!(back.comments, vec!["This file was generated. DO NOT EDIT!"]);
}
