//! Conversion between `FileDescriptorProto` and the schema model.
//!
//! The decode direction rejects every construct the model cannot carry
//! (oneof, extensions, services, options other than `map_entry`/`packed`,
//! non-proto3 syntax). Type names are kept verbatim as
//! [`TypeRef::Named`]; binding them is left to the symbol table.

use prost::Message;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, MessageOptions, OneofDescriptorProto, SourceCodeInfo,
    field_descriptor_proto::{Label, Type},
    source_code_info::Location,
};
use protoros_core::{
    Construct, DecodeError, EnumType, EnumValue, Field, MessageType, Repetition, ScalarType,
    SchemaFile, Syntax, TypeRef, UnsupportedConstructError, ensure_zero_first,
};

use crate::{
    DescriptorError,
    comments::{
        CommentIndex, ENUM_VALUE, FILE_ENUM, FILE_MESSAGE, MESSAGE_ENUM, MESSAGE_FIELD,
        MESSAGE_NESTED, child, location,
    },
};

/// Decode a serialized `FileDescriptorProto` into a proto-flavored [`SchemaFile`].
pub fn from_descriptor(bytes: &[u8]) -> Result<SchemaFile, DescriptorError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty.into());
    }
    let proto = FileDescriptorProto::decode(bytes).map_err(|e| DecodeError::Malformed {
        source: Box::new(e),
    })?;
    log::debug!(
        "decoded descriptor {}: {} messages, {} enums",
        proto.name(),
        proto.message_type.len(),
        proto.enum_type.len()
    );
    Ok(schema_from_file_descriptor(&proto)?)
}

/// Strict conversion of one descriptor.
pub fn schema_from_file_descriptor(
    fd: &FileDescriptorProto,
) -> Result<SchemaFile, UnsupportedConstructError> {
    let file_name = fd.name();
    let unsupported = |construct| UnsupportedConstructError::new(construct, file_name);

    match fd.syntax() {
        "proto3" => {}
        "" => return Err(unsupported(Construct::Syntax("proto2".to_string()))),
        other => return Err(unsupported(Construct::Syntax(other.to_string()))),
    }
    if !fd.service.is_empty() {
        return Err(unsupported(Construct::Service));
    }
    if !fd.extension.is_empty() {
        return Err(unsupported(Construct::Extension));
    }

    let comments = CommentIndex::new(fd.source_code_info.as_ref());
    let mut file = SchemaFile::new(file_name, Syntax::Proto3).with_package(split_package(fd.package()));
    file.imports = fd.dependency.clone();
    file.enums = fd
        .enum_type
        .iter()
        .enumerate()
        .map(|(i, e)| convert_enum(file_name, e, &child(&[], FILE_ENUM, i), &comments))
        .collect::<Result<_, _>>()?;
    file.messages = fd
        .message_type
        .iter()
        .enumerate()
        .map(|(i, m)| convert_message(file_name, m, &child(&[], FILE_MESSAGE, i), &comments))
        .collect::<Result<_, _>>()?;
    Ok(file)
}

/// Names-only view of a descriptor for building the symbol table.
///
/// Never fails: import-only files are not checked for unsupported constructs.
pub fn file_skeleton(fd: &FileDescriptorProto) -> SchemaFile {
    fn skeleton(m: &DescriptorProto) -> MessageType {
        let mut out = MessageType::new(m.name());
        out.nested_messages = m.nested_type.iter().map(skeleton).collect();
        out.nested_enums = m.enum_type.iter().map(enum_skeleton).collect();
        out
    }
    fn enum_skeleton(e: &EnumDescriptorProto) -> EnumType {
        EnumType {
            name: e.name().to_string(),
            values: e
                .value
                .iter()
                .map(|v| EnumValue::new(v.name(), v.number()))
                .collect(),
            comments: Vec::new(),
        }
    }

    let mut file = SchemaFile::new(fd.name(), Syntax::Proto3).with_package(split_package(fd.package()));
    file.imports = fd.dependency.clone();
    file.messages = fd.message_type.iter().map(skeleton).collect();
    file.enums = fd.enum_type.iter().map(enum_skeleton).collect();
    file
}

fn split_package(package: &str) -> Vec<String> {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn convert_message(
    file: &str,
    m: &DescriptorProto,
    path: &[i32],
    comments: &CommentIndex,
) -> Result<MessageType, UnsupportedConstructError> {
    let unsupported =
        |construct, field: Option<&str>| UnsupportedConstructError::new(construct, file).at(m.name(), field);

    if !m.extension.is_empty() || !m.extension_range.is_empty() {
        return Err(unsupported(Construct::Extension, None));
    }
    if let Some(options) = &m.options {
        let rest = MessageOptions {
            map_entry: None,
            ..options.clone()
        };
        if rest != MessageOptions::default() {
            let name = if rest.deprecated.is_some() { "deprecated" } else { "message option" };
            return Err(unsupported(Construct::Option(name.to_string()), None));
        }
    }

    let mut out = MessageType::new(m.name());
    out.comments = comments.get(path);

    for (i, f) in m.field.iter().enumerate() {
        if f.oneof_index.is_some() && !f.proto3_optional() {
            return Err(unsupported(Construct::Oneof, Some(f.name())));
        }
        if f.extendee.is_some() {
            return Err(unsupported(Construct::Extension, Some(f.name())));
        }
        if let Some(options) = &f.options {
            let rest = FieldOptions {
                packed: None,
                ..options.clone()
            };
            if rest != FieldOptions::default() {
                let name = if rest.deprecated.is_some() { "deprecated" } else { "field option" };
                return Err(unsupported(Construct::Option(name.to_string()), Some(f.name())));
            }
        }

        let mut field = Field::new(f.name(), field_type(f));
        if f.label() == Label::Repeated {
            field.repetition = Repetition::Repeated;
        }
        field.optional = f.proto3_optional();
        field.ordinal = f.number.map(|n| n as u32);
        field.default = f.default_value.clone();
        field.comments = comments.get(&child(path, MESSAGE_FIELD, i));
        out.fields.push(field);
    }

    out.nested_enums = m
        .enum_type
        .iter()
        .enumerate()
        .map(|(i, e)| convert_enum(file, e, &child(path, MESSAGE_ENUM, i), comments))
        .collect::<Result<_, _>>()?;
    out.nested_messages = m
        .nested_type
        .iter()
        .enumerate()
        .map(|(i, n)| convert_message(file, n, &child(path, MESSAGE_NESTED, i), comments))
        .collect::<Result<_, _>>()?;
    Ok(out)
}

fn convert_enum(
    file: &str,
    e: &EnumDescriptorProto,
    path: &[i32],
    comments: &CommentIndex,
) -> Result<EnumType, UnsupportedConstructError> {
    let has_options = e.options.as_ref().is_some_and(|o| *o != Default::default())
        || e.value
            .iter()
            .any(|v| v.options.as_ref().is_some_and(|o| *o != Default::default()));
    if has_options {
        return Err(UnsupportedConstructError::new(
            Construct::Option("enum option".to_string()),
            file,
        )
        .at(e.name(), None));
    }

    Ok(EnumType {
        name: e.name().to_string(),
        values: e
            .value
            .iter()
            .enumerate()
            .map(|(i, v)| EnumValue {
                name: v.name().to_string(),
                number: v.number(),
                comments: comments.get(&child(path, ENUM_VALUE, i)),
            })
            .collect(),
        comments: comments.get(path),
    })
}

fn field_type(f: &FieldDescriptorProto) -> TypeRef {
    let scalar = match f.r#type() {
        Type::Double => ScalarType::Float64,
        Type::Float => ScalarType::Float32,
        Type::Int64 => ScalarType::Int64,
        Type::Uint64 => ScalarType::UInt64,
        Type::Int32 => ScalarType::Int32,
        Type::Fixed64 => ScalarType::Fixed64,
        Type::Fixed32 => ScalarType::Fixed32,
        Type::Bool => ScalarType::Bool,
        Type::String => ScalarType::String,
        Type::Bytes => ScalarType::Bytes,
        Type::Uint32 => ScalarType::UInt32,
        Type::Sfixed32 => ScalarType::SFixed32,
        Type::Sfixed64 => ScalarType::SFixed64,
        Type::Sint32 => ScalarType::SInt32,
        Type::Sint64 => ScalarType::SInt64,
        Type::Message | Type::Group | Type::Enum => {
            return TypeRef::Named(f.type_name().to_string());
        }
    };
    TypeRef::Scalar(scalar)
}

/// Build a proto3 `FileDescriptorProto` from a schema file.
///
/// Enums get a zero value first, missing ordinals are numbered `1..=N` in
/// declaration order, and comments are written to `source_code_info`.
pub fn file_descriptor(file: &SchemaFile) -> FileDescriptorProto {
    let mut locations = Vec::new();
    let package = file.package.join(".");

    let message_type = file
        .messages
        .iter()
        .enumerate()
        .map(|(i, m)| message_descriptor(m, &child(&[], FILE_MESSAGE, i), &mut locations))
        .collect();
    let enum_type = file
        .enums
        .iter()
        .enumerate()
        .map(|(i, e)| enum_descriptor(e, &child(&[], FILE_ENUM, i), &mut locations))
        .collect();

    FileDescriptorProto {
        name: Some(file.name.clone()),
        package: (!package.is_empty()).then_some(package),
        dependency: file.imports.clone(),
        message_type,
        enum_type,
        syntax: Some("proto3".to_string()),
        source_code_info: (!locations.is_empty()).then_some(SourceCodeInfo {
            location: locations,
        }),
        ..Default::default()
    }
}

/// Serialized form of [`file_descriptor`].
pub fn to_descriptor(file: &SchemaFile) -> Vec<u8> {
    file_descriptor(file).encode_to_vec()
}

fn message_descriptor(m: &MessageType, path: &[i32], locations: &mut Vec<Location>) -> DescriptorProto {
    if !m.comments.is_empty() {
        locations.push(location(path.to_vec(), &m.comments));
    }

    let mut oneof_decl = Vec::new();
    let mut fields = Vec::with_capacity(m.fields.len());
    for (i, f) in m.fields.iter().enumerate() {
        let mut fd = field_descriptor(f, i);
        if f.optional {
            fd.oneof_index = Some(oneof_decl.len() as i32);
            oneof_decl.push(OneofDescriptorProto {
                name: Some(format!("_{}", f.name)),
                ..Default::default()
            });
        }
        if !f.comments.is_empty() {
            locations.push(location(child(path, MESSAGE_FIELD, i), &f.comments));
        }
        fields.push(fd);
    }

    let nested_type = m
        .nested_messages
        .iter()
        .enumerate()
        .map(|(i, n)| message_descriptor(n, &child(path, MESSAGE_NESTED, i), locations))
        .collect();
    let enum_type = m
        .nested_enums
        .iter()
        .enumerate()
        .map(|(i, e)| enum_descriptor(e, &child(path, MESSAGE_ENUM, i), locations))
        .collect();

    DescriptorProto {
        name: Some(m.name.clone()),
        field: fields,
        nested_type,
        enum_type,
        oneof_decl,
        ..Default::default()
    }
}

fn field_descriptor(f: &Field, index: usize) -> FieldDescriptorProto {
    let (ty, type_name) = match &f.ty {
        TypeRef::Scalar(s) => (scalar_type(s.to_proto().0), None),
        TypeRef::Message(name) => (Type::Message, Some(format!(".{}", name.qualified()))),
        TypeRef::Enum(name) => (Type::Enum, Some(format!(".{}", name.qualified()))),
        TypeRef::WellKnown(wk) => (Type::Message, Some(format!(".{}", wk.proto_name()))),
        TypeRef::Named(raw) => (Type::Message, Some(raw.replace('/', "."))),
    };
    let label = if f.is_repeated() { Label::Repeated } else { Label::Optional };

    FieldDescriptorProto {
        name: Some(f.name.clone()),
        number: Some(f.ordinal.map_or(index as i32 + 1, |n| n as i32)),
        label: Some(label.into()),
        r#type: Some(ty.into()),
        type_name,
        proto3_optional: f.optional.then_some(true),
        ..Default::default()
    }
}

fn scalar_type(s: ScalarType) -> Type {
    match s {
        ScalarType::Bool => Type::Bool,
        ScalarType::Int32 => Type::Int32,
        ScalarType::Int64 => Type::Int64,
        ScalarType::UInt32 => Type::Uint32,
        ScalarType::UInt64 => Type::Uint64,
        ScalarType::Float32 => Type::Float,
        ScalarType::Float64 => Type::Double,
        ScalarType::String => Type::String,
        ScalarType::SInt32 => Type::Sint32,
        ScalarType::SInt64 => Type::Sint64,
        ScalarType::Fixed32 => Type::Fixed32,
        ScalarType::Fixed64 => Type::Fixed64,
        ScalarType::SFixed32 => Type::Sfixed32,
        ScalarType::SFixed64 => Type::Sfixed64,
        ScalarType::Bytes => Type::Bytes,
        // ROS-only scalars never reach here after `to_proto`.
        _ => Type::String,
    }
}

fn enum_descriptor(e: &EnumType, path: &[i32], locations: &mut Vec<Location>) -> EnumDescriptorProto {
    let e = ensure_zero_first(e);
    if !e.comments.is_empty() {
        locations.push(location(path.to_vec(), &e.comments));
    }
    let value = e
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if !v.comments.is_empty() {
                locations.push(location(child(path, ENUM_VALUE, i), &v.comments));
            }
            EnumValueDescriptorProto {
                name: Some(v.name.clone()),
                number: Some(v.number),
                ..Default::default()
            }
        })
        .collect();
    EnumDescriptorProto {
        name: Some(e.name.clone()),
        value,
        ..Default::default()
    }
}
