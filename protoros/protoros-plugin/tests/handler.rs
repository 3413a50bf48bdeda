
use prost_types::field_descriptor_proto::Type;
use protoros_core::DecodeError;
use protoros_plugin::{HandlerState, MsgGenerator, PluginError, PluginHandler, PluginOptions};
use test_helpers::*;

// ── translation ────────────────────────────────────────────────────────────────

#[test]
fn trailing_comment_becomes_leading_ros_comment() {
    let mut file = descriptor_file(
        "example.proto",
        "demo",
        vec![msg("Example", vec![field("MyInt", 1, Type::Int32)])],
        vec![],
    );
    file.source_code_info = Some(trailing_comment(&[4, 0, 2, 0], " MyInt - Example trailing Comment\n"));

    let (result, response) = run_plugin(MsgGenerator, &request(vec![file], &["example.proto"], None));
    let outcome = result.unwrap();

    assert_eq!(outcome.generated, vec!["demo/Example.msg"]);
    assert!(outcome.failed.is_empty());
    assert_eq!(response.error, None);
    assert_eq!(response.supported_features, Some(1));
    assert_eq!(
        content(&response, "demo/Example.msg"),
        "# This file was generated. DO NOT EDIT!\n\
         \n\
         # Example\n\
         # MyInt - Example trailing Comment\n\
         int32 MyInt\n"
    );
}

#[test]
fn nested_messages_get_their_own_files() {
    let mut outer = msg(
        "Outer",
        vec![reference("inner", 1, Type::Message, ".demo.Outer.Inner")],
    );
    outer
        .nested_type
        .push(msg("Inner", vec![field("v", 1, Type::Double)]));
    let file = descriptor_file("outer.proto", "demo", vec![outer], vec![]);

    let (result, response) = run_plugin(MsgGenerator, &request(vec![file], &["outer.proto"], None));
    result.unwrap();

    assert_eq!(file_names(&response), vec!["demo/Outer.msg", "demo/Inner.msg"]);
    assert!(content(&response, "demo/Outer.msg").contains("\nInner inner\n"));
    assert!(content(&response, "demo/Inner.msg").contains("\nfloat64 v\n"));
}

#[test]
fn enum_field_expands_into_constants() {
    let robot = msg("Robot", vec![reference("mode", 1, Type::Enum, ".demo.Mode")]);
    let file = descriptor_file(
        "robot.proto",
        "demo",
        vec![robot],
        vec![enumeration("Mode", &[("IDLE", 0), ("RUN", 1)])],
    );

    let (result, response) = run_plugin(MsgGenerator, &request(vec![file], &["robot.proto"], None));
    result.unwrap();

    let text = content(&response, "demo/Robot.msg");
    assert!(text.contains("# Mode\nuint8 mode\n"));
    assert!(text.ends_with("\n# Mode\nuint8 IDLE=0\nuint8 RUN=1\n"));
}

#[test]
fn enum_repr_parameter_is_applied() {
    let robot = msg("Robot", vec![reference("mode", 1, Type::Enum, ".demo.Mode")]);
    let file = descriptor_file("robot.proto", "demo", vec![robot], vec![enumeration("Mode", &[("IDLE", 0)])]);

    let (result, response) = run_plugin(
        MsgGenerator,
        &request(vec![file], &["robot.proto"], Some("enum_repr=int32")),
    );
    result.unwrap();

    assert!(content(&response, "demo/Robot.msg").contains("int32 IDLE=0\n"));
}

/// Import-only files resolve references but produce no output.
#[test]
fn imports_resolve_without_being_generated() {
    let geo = descriptor_file(
        "geo/point.proto",
        "geo",
        vec![msg("Point", vec![field("x", 1, Type::Double)])],
        vec![],
    );
    let mut robot = descriptor_file(
        "robot.proto",
        "demo",
        vec![msg("Robot", vec![reference("origin", 1, Type::Message, ".geo.Point")])],
        vec![],
    );
    robot.dependency.push("geo/point.proto".to_string());

    let (result, response) = run_plugin(MsgGenerator, &request(vec![geo, robot], &["robot.proto"], None));
    result.unwrap();

    assert_eq!(file_names(&response), vec!["demo/Robot.msg"]);
    assert!(content(&response, "demo/Robot.msg").contains("\ngeo/Point origin\n"));
}

#[test]
fn outputs_follow_request_order() {
    let names: Vec<String> = (0..16).map(|i| format!("m{i}.proto")).collect();
    let files = names
        .iter()
        .enumerate()
        .map(|(i, n)| {
            descriptor_file(
                n,
                "demo",
                vec![msg(&format!("M{i}"), vec![field("v", 1, Type::Bool)])],
                vec![],
            )
        })
        .collect();
    let to_generate: Vec<&str> = names.iter().rev().map(String::as_str).collect();

    let (result, response) = run_plugin(MsgGenerator, &request(files, &to_generate, None));
    result.unwrap();

    let expected: Vec<String> = (0..16).rev().map(|i| format!("demo/M{i}.msg")).collect();
    assert_eq!(file_names(&response), expected);
}

// ── per-file failures ──────────────────────────────────────────────────────────

#[test]
fn oneof_fails_only_its_own_file() {
    let bad = descriptor_file("bad.proto", "demo", vec![message_with_oneof("Command")], vec![]);
    let good = descriptor_file(
        "good.proto",
        "demo",
        vec![msg("Status", vec![field("ok", 1, Type::Bool)])],
        vec![],
    );

    let (result, response) = run_plugin(
        MsgGenerator,
        &request(vec![bad, good], &["bad.proto", "good.proto"], None),
    );
    let outcome = result.unwrap();

    assert_eq!(outcome.failed, vec!["bad.proto"]);
    assert_eq!(response.error, None);
    assert_eq!(file_names(&response), vec!["bad.proto.error", "demo/Status.msg"]);
    let report = content(&response, "bad.proto.error");
    assert!(report.contains("oneof"));
    assert!(report.contains("Command.speed"));
}

#[test]
fn shared_enum_value_name_fails_the_file() {
    let mut robot = msg(
        "Robot",
        vec![
            reference("mode", 1, Type::Enum, ".demo.Robot.Mode"),
            reference("status", 2, Type::Enum, ".demo.Status"),
        ],
    );
    robot
        .enum_type
        .push(enumeration("Mode", &[("UNKNOWN", 0), ("AUTO", 1)]));
    let bad = descriptor_file(
        "robot.proto",
        "demo",
        vec![robot],
        vec![enumeration("Status", &[("UNKNOWN", 0), ("OK", 1)])],
    );
    let good = descriptor_file("good.proto", "demo", vec![msg("Ping", vec![])], vec![]);

    let (result, response) = run_plugin(
        MsgGenerator,
        &request(vec![bad, good], &["robot.proto", "good.proto"], None),
    );

    assert_eq!(result.unwrap().failed, vec!["robot.proto"]);
    assert_eq!(file_names(&response), vec!["robot.proto.error", "demo/Ping.msg"]);
    let report = content(&response, "robot.proto.error");
    assert!(report.contains("duplicate name `UNKNOWN`"));
    assert!(report.contains("demo.Robot.Mode"));
    assert!(report.contains("demo.Status"));
}

/// `demo.Outer.Item` and `demo.Item` would both become `demo/Item.msg`.
#[test]
fn flattened_name_clash_across_files_fails_both() {
    let mut outer = msg(
        "Outer",
        vec![reference("item", 1, Type::Message, ".demo.Outer.Item")],
    );
    outer.nested_type.push(msg("Item", vec![]));
    let a = descriptor_file("a.proto", "demo", vec![outer], vec![]);
    let b = descriptor_file("b.proto", "demo", vec![msg("Item", vec![])], vec![]);
    let c = descriptor_file("c.proto", "demo", vec![msg("Status", vec![])], vec![]);

    let (result, response) = run_plugin(
        MsgGenerator,
        &request(vec![a, b, c], &["a.proto", "b.proto", "c.proto"], None),
    );
    let outcome = result.unwrap();

    assert_eq!(outcome.failed, vec!["a.proto", "b.proto"]);
    assert_eq!(response.error, None);
    assert_eq!(
        file_names(&response),
        vec!["a.proto.error", "b.proto.error", "demo/Status.msg"]
    );
    assert!(content(&response, "a.proto.error").contains("demo.Outer.Item"));
}

#[test]
fn unresolved_reference_fails_the_file() {
    let file = descriptor_file(
        "robot.proto",
        "demo",
        vec![msg("Robot", vec![reference("pose", 1, Type::Message, ".demo.Pose")])],
        vec![],
    );

    let (result, response) = run_plugin(MsgGenerator, &request(vec![file], &["robot.proto"], None));
    assert_eq!(result.unwrap().failed, vec!["robot.proto"]);
    assert!(content(&response, "robot.proto.error").contains("Pose"));
}

#[test]
fn strict_turns_file_error_into_top_level_error() {
    let bad = descriptor_file("bad.proto", "demo", vec![message_with_oneof("Command")], vec![]);
    let good = descriptor_file("good.proto", "demo", vec![msg("Status", vec![])], vec![]);
    let input = request(vec![bad, good], &["bad.proto", "good.proto"], Some("strict"));

    let mut handler = PluginHandler::new(MsgGenerator, PluginOptions::default());
    let mut output = Vec::new();
    let err = handler.run(input.as_slice(), &mut output).unwrap_err();

    assert!(matches!(&err, PluginError::Strict { file, .. } if file == "bad.proto"));
    assert_eq!(handler.state(), HandlerState::Failed);
    let response = <prost_types::compiler::CodeGeneratorResponse as prost::Message>::decode(
        output.as_slice(),
    )
    .unwrap();
    assert!(response.file.is_empty());
    assert!(response.error.unwrap().contains("oneof"));
}

// ── invocation failures ────────────────────────────────────────────────────────

#[test]
fn empty_input_is_rejected() {
    let (result, response) = run_plugin(MsgGenerator, &[]);
    assert!(matches!(result, Err(PluginError::Decode(DecodeError::Empty))));
    assert!(response.file.is_empty());
    assert!(response.error.is_some());
}

#[test]
fn malformed_input_is_rejected() {
    let (result, response) = run_plugin(MsgGenerator, &[0xff, 0xff, 0xff]);
    assert!(matches!(result, Err(PluginError::Decode(DecodeError::Malformed { .. }))));
    assert!(response.file.is_empty());
    assert!(response.error.unwrap().contains("malformed"));
}

#[test]
fn missing_file_to_generate_is_rejected() {
    let file = descriptor_file("a.proto", "demo", vec![msg("A", vec![])], vec![]);
    let (result, _) = run_plugin(MsgGenerator, &request(vec![file], &["b.proto"], None));
    assert!(matches!(
        result,
        Err(PluginError::Decode(DecodeError::MissingFile { name })) if name == "b.proto"
    ));
}

#[test]
fn unknown_parameter_is_rejected() {
    let file = descriptor_file("a.proto", "demo", vec![msg("A", vec![])], vec![]);
    let (result, _) = run_plugin(MsgGenerator, &request(vec![file], &["a.proto"], Some("colour=red")));
    assert!(matches!(result, Err(PluginError::Decode(DecodeError::Parameter { .. }))));
}

// ── state machine ──────────────────────────────────────────────────────────────

#[test]
fn state_moves_from_awaiting_to_done() {
    let file = descriptor_file("a.proto", "demo", vec![msg("A", vec![])], vec![]);
    let input = request(vec![file], &["a.proto"], None);

    let mut handler = PluginHandler::new(MsgGenerator, PluginOptions::default());
    assert_eq!(handler.state(), HandlerState::AwaitingRequest);
    handler.run(input.as_slice(), Vec::new()).unwrap();
    assert_eq!(handler.state(), HandlerState::Done);
}

#[test]
fn decode_failure_moves_to_failed() {
    let mut handler = PluginHandler::new(MsgGenerator, PluginOptions::default());
    assert!(handler.run(std::io::empty(), Vec::new()).is_err());
    assert_eq!(handler.state(), HandlerState::Failed);
}
