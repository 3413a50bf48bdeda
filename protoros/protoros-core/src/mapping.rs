//! Type Mapper: pure conversion between proto-flavored and ROS-flavored models.
//!
//! | Proto construct      | ROS construct                         | Loss recorded         |
//! |----------------------|---------------------------------------|-----------------------|
//! | shared scalar        | same scalar                           |                       |
//! | other scalar         | widened scalar                        | `ScalarWidened`       |
//! | `repeated T`         | `T[]`                                 | `BoundDiscarded` (ROS→proto) |
//! | nested message       | sibling message, referenced by name   | `NestingFlattened`    |
//! | enum                 | integer constants on the user message | `EnumFlattened`       |
//! | unreferenced enum    |                                       | `EnumDropped`         |
//! | (none)               | ROS constant → leading `//` comment   | `ConstantAsComment`   |
//! | default value        | dropped                               | `DefaultDropped`      |
//! | proto3 `optional`    | plain field                           | `PresenceDropped`     |
//!
//! Both directions run [`resolve`] first, so unresolved or ambiguous
//! references fail the file before anything is mapped.

use std::collections::{BTreeSet, HashMap};

use crate::{
    error::{AmbiguousReferenceError, DuplicateNameError, TranslateError, UnresolvedReferenceError},
    loss::{LossKind, LossRecord},
    model::{
        Constant, EnumType, EnumValue, Field, MessageType, SchemaFile, Syntax, TypeName, TypeRef,
    },
    naming::{proto_file_name, to_upper_snake_case},
    policy::{EnumRepr, MappingPolicy},
    scalar::{ScalarType, WellKnownType},
    symbols::{SymbolTable, resolve},
};

/// Output of a mapping step: the new model plus everything it discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub file: SchemaFile,
    pub losses: Vec<LossRecord>,
}

/// Convert a proto-flavored file into a ROS-flavored one.
///
/// Nested messages are flattened into siblings named after their innermost
/// name; each enum referenced by a message is appended to that message as a
/// group of integer constants.
pub fn map_to_ros(
    file: &SchemaFile,
    symbols: &SymbolTable,
    policy: &MappingPolicy,
) -> Result<Translation, TranslateError> {
    let resolved = resolve(file, symbols)?;
    let mut losses = Vec::new();

    let mut flat: Vec<(TypeName, &MessageType)> = Vec::new();
    let root = TypeName::new(resolved.package.clone(), Vec::new());
    for message in &resolved.messages {
        flatten(&root, message, &mut flat);
    }
    check_flat_names(&resolved, &flat)?;
    for (name, _) in &flat {
        check_flattened(&resolved, symbols, name)?;
    }

    let mut referenced_enums: BTreeSet<TypeName> = BTreeSet::new();
    let mut messages = Vec::with_capacity(flat.len());
    for (name, message) in &flat {
        if let Some(parent) = name.parent() {
            losses.push(LossRecord::new(
                LossKind::NestingFlattened,
                &message.name,
                None,
                format!("nested in `{}`, emitted as a sibling message", parent.path.join(".")),
            ));
        }
        let out = message_to_ros(&resolved, message, symbols, policy, &mut losses, &mut referenced_enums)?;
        messages.push(out);
    }

    for (enum_name, def) in local_enums(&resolved) {
        if !referenced_enums.contains(&enum_name) {
            losses.push(LossRecord::new(
                LossKind::EnumDropped,
                &def.name,
                None,
                "not referenced by any message field",
            ));
        }
    }

    for loss in &losses {
        log::debug!("{}: {loss}", resolved.name);
    }

    Ok(Translation {
        file: SchemaFile {
            name: resolved.name.clone(),
            syntax: Syntax::RosMsg,
            package: resolved.package.clone(),
            imports: Vec::new(),
            messages,
            enums: Vec::new(),
        },
        losses,
    })
}

fn flatten<'a>(scope: &TypeName, message: &'a MessageType, out: &mut Vec<(TypeName, &'a MessageType)>) {
    let name = scope.child(&message.name);
    out.push((name.clone(), message));
    for nested in &message.nested_messages {
        flatten(&name, nested, out);
    }
}

/// Two nested messages with the same innermost name would land in the same
/// ROS file name.
fn check_flat_names(file: &SchemaFile, flat: &[(TypeName, &MessageType)]) -> Result<(), TranslateError> {
    let mut seen: HashMap<&str, Vec<String>> = HashMap::new();
    for (name, _) in flat {
        seen.entry(name.name()).or_default().push(name.qualified());
    }
    if let Some((name, candidates)) = flat
        .iter()
        .map(|(n, _)| n.name())
        .find_map(|n| seen.get(n).filter(|c| c.len() > 1).map(|c| (n, c)))
    {
        return Err(AmbiguousReferenceError {
            name: name.to_string(),
            file: file.name.clone(),
            candidates: candidates.clone(),
        }
        .into());
    }
    Ok(())
}

/// A message whose flattened name is shared with a message of another file
/// would overwrite that file's output, and references to it would point at
/// the wrong type.
fn check_flattened(file: &SchemaFile, symbols: &SymbolTable, name: &TypeName) -> Result<(), TranslateError> {
    match symbols.flattened_collisions(name) {
        Some(candidates) => Err(AmbiguousReferenceError {
            name: name.name().to_string(),
            file: file.name.clone(),
            candidates,
        }
        .into()),
        None => Ok(()),
    }
}

fn local_enums(file: &SchemaFile) -> Vec<(TypeName, &EnumType)> {
    fn walk<'a>(scope: &TypeName, message: &'a MessageType, out: &mut Vec<(TypeName, &'a EnumType)>) {
        let name = scope.child(&message.name);
        for e in &message.nested_enums {
            out.push((name.child(&e.name), e));
        }
        for nested in &message.nested_messages {
            walk(&name, nested, out);
        }
    }

    let root = TypeName::new(file.package.clone(), Vec::new());
    let mut out: Vec<(TypeName, &EnumType)> = file.enums.iter().map(|e| (root.child(&e.name), e)).collect();
    for message in &file.messages {
        walk(&root, message, &mut out);
    }
    out
}

fn message_to_ros(
    file: &SchemaFile,
    message: &MessageType,
    symbols: &SymbolTable,
    policy: &MappingPolicy,
    losses: &mut Vec<LossRecord>,
    referenced_enums: &mut BTreeSet<TypeName>,
) -> Result<MessageType, TranslateError> {
    let mut out = MessageType {
        name: message.name.clone(),
        comments: message.comments.clone(),
        constants: message.constants.clone(),
        ..Default::default()
    };
    // Enums in first-reference order, each emitted once per message.
    let mut enum_groups: Vec<(TypeName, ScalarType)> = Vec::new();

    for field in &message.fields {
        let mut mapped = Field {
            ordinal: None,
            default: None,
            optional: false,
            bounds: Vec::new(),
            ..field.clone()
        };
        let at = |kind, detail: String| LossRecord::new(kind, &message.name, Some(&field.name), detail);

        mapped.ty = match &field.ty {
            TypeRef::Scalar(s) => {
                let (ros, lossless) = s.to_ros();
                if !lossless {
                    losses.push(at(LossKind::ScalarWidened, format!("{s} → {ros}")));
                }
                TypeRef::Scalar(ros)
            }
            TypeRef::Message(name) => {
                check_flattened(file, symbols, name)?;
                TypeRef::Message(flat_name(name))
            }
            TypeRef::Enum(name) => {
                let def = symbols.enum_def(name).ok_or_else(|| UnresolvedReferenceError {
                    name: name.qualified(),
                    file: file.name.clone(),
                    message: message.name.clone(),
                    field: field.name.clone(),
                })?;
                let repr = enum_scalar(def, policy.enum_repr);
                if policy.enum_repr == EnumRepr::UInt8 && repr != ScalarType::UInt8 {
                    losses.push(at(
                        LossKind::ScalarWidened,
                        format!("values of `{}` do not fit uint8, used {repr}", def.name),
                    ));
                }
                losses.push(at(
                    LossKind::EnumFlattened,
                    format!("enum `{}` became {repr} constants", def.name),
                ));
                mapped.comments.push(def.name.clone());
                if !enum_groups.iter().any(|(n, _)| n == name) {
                    enum_groups.push((name.clone(), repr));
                }
                referenced_enums.insert(name.clone());
                TypeRef::Scalar(repr)
            }
            TypeRef::WellKnown(wk) => {
                if *wk == WellKnownType::BytesValue {
                    losses.push(at(
                        LossKind::ScalarWidened,
                        format!("{} → {}", wk.proto_name(), wk.ros_name()),
                    ));
                }
                TypeRef::WellKnown(*wk)
            }
            TypeRef::Named(raw) => {
                return Err(UnresolvedReferenceError {
                    name: raw.clone(),
                    file: file.name.clone(),
                    message: message.name.clone(),
                    field: field.name.clone(),
                }
                .into());
            }
        };

        if let Some(default) = &field.default {
            losses.push(at(LossKind::DefaultDropped, format!("default `{default}`")));
        }
        if field.optional {
            losses.push(at(LossKind::PresenceDropped, "proto3 optional".to_string()));
        }
        for bound in &field.bounds {
            losses.push(at(LossKind::BoundDiscarded, bound.to_string()));
        }
        out.fields.push(mapped);
    }

    let mut sources: HashMap<String, Vec<String>> = HashMap::new();
    for field in &out.fields {
        sources.entry(field.name.clone()).or_default().push(format!("field `{}`", field.name));
    }
    for constant in &out.constants {
        sources.entry(constant.name.clone()).or_default().push(format!("constant `{}`", constant.name));
    }
    for (name, repr) in enum_groups {
        if let Some(def) = symbols.enum_def(&name) {
            for constant in enum_to_constants(def, repr) {
                sources.entry(constant.name.clone()).or_default().push(format!("enum `{}`", name.qualified()));
                out.constants.push(constant);
            }
        }
    }

    // Enum values are never renamed, so a clash fails the file.
    let declared = out.fields.iter().map(|f| &f.name).chain(out.constants.iter().map(|c| &c.name));
    for name in declared {
        if let Some(found) = sources.get(name).filter(|s| s.len() > 1) {
            return Err(DuplicateNameError {
                name: name.clone(),
                file: file.name.clone(),
                message: message.name.clone(),
                sources: found.clone(),
            }
            .into());
        }
    }
    Ok(out)
}

/// Scalar used for the constants of `def` under `repr`.
///
/// `uint8` is only used when every value fits; otherwise the constants are
/// `int32`.
pub fn enum_scalar(def: &EnumType, repr: EnumRepr) -> ScalarType {
    let fits_uint8 = def.values.iter().all(|v| (0..=255).contains(&v.number));
    match repr {
        EnumRepr::Int32 => ScalarType::Int32,
        EnumRepr::UInt8 | EnumRepr::Auto if fits_uint8 => ScalarType::UInt8,
        EnumRepr::UInt8 | EnumRepr::Auto => ScalarType::Int32,
    }
}

/// One constant per enum value, in declaration order; the enum name and its
/// documentation lead the group.
pub fn enum_to_constants(def: &EnumType, ty: ScalarType) -> Vec<Constant> {
    def.values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let mut constant = Constant::new(&v.name, ty, v.number.to_string());
            if i == 0 {
                constant.comments.push(def.name.clone());
                constant.comments.extend(def.comments.iter().cloned());
            }
            constant.comments.extend(v.comments.iter().cloned());
            constant
        })
        .collect()
}

fn flat_name(name: &TypeName) -> TypeName {
    TypeName::new(name.package.clone(), vec![name.name().to_string()])
}

/// Convert a ROS-flavored file into a proto-flavored one.
///
/// Field ordinals are assigned `1..=N` in declaration order. Constants are
/// not representable in proto3 and become comments: above the field they
/// precede, or above the message when no field follows them.
pub fn map_to_proto(file: &SchemaFile, symbols: &SymbolTable) -> Result<Translation, TranslateError> {
    let resolved = resolve(file, symbols)?;
    let mut losses = Vec::new();
    let mut imports = BTreeSet::new();
    let local: BTreeSet<&str> = resolved.messages.iter().map(|m| m.name.as_str()).collect();

    let mut messages = Vec::with_capacity(resolved.messages.len());
    for message in &resolved.messages {
        messages.push(message_to_proto(&resolved, message, &local, &mut imports, &mut losses));
    }

    for loss in &losses {
        log::debug!("{}: {loss}", resolved.name);
    }

    let name = resolved
        .messages
        .first()
        .map(|m| proto_file_name(&resolved.package, &m.name))
        .unwrap_or_else(|| resolved.name.clone());

    Ok(Translation {
        file: SchemaFile {
            name,
            syntax: Syntax::Proto3,
            package: resolved.package.clone(),
            imports: imports.into_iter().collect(),
            messages,
            enums: resolved.enums.clone(),
        },
        losses,
    })
}

fn message_to_proto(
    file: &SchemaFile,
    message: &MessageType,
    local: &BTreeSet<&str>,
    imports: &mut BTreeSet<String>,
    losses: &mut Vec<LossRecord>,
) -> MessageType {
    let mut out = MessageType {
        name: message.name.clone(),
        comments: message.comments.clone(),
        nested_enums: message.nested_enums.clone(),
        ..Default::default()
    };

    for (i, field) in message.fields.iter().enumerate() {
        let at = |kind, detail: String| LossRecord::new(kind, &message.name, Some(&field.name), detail);
        let mut mapped = Field {
            ordinal: Some(i as u32 + 1),
            default: None,
            bounds: Vec::new(),
            ..field.clone()
        };

        mapped.ty = match &field.ty {
            TypeRef::Scalar(s) => {
                let (proto, lossless) = s.to_proto();
                if !lossless {
                    losses.push(at(LossKind::ScalarWidened, format!("{s} → {proto}")));
                }
                TypeRef::Scalar(proto)
            }
            TypeRef::Message(name) => {
                let same_file = name.package == file.package && local.contains(name.name());
                if !same_file {
                    imports.insert(proto_file_name(&name.package, name.name()));
                }
                TypeRef::Message(name.clone())
            }
            TypeRef::WellKnown(wk) => {
                imports.insert(wk.proto_import().to_string());
                TypeRef::WellKnown(*wk)
            }
            other => other.clone(),
        };

        for bound in &field.bounds {
            losses.push(at(LossKind::BoundDiscarded, bound.to_string()));
            mapped.comments.push(bound.to_string());
        }
        if let Some(default) = &field.default {
            losses.push(at(LossKind::DefaultDropped, format!("default `{default}`")));
        }
        out.fields.push(mapped);
    }

    // Constants anchored to a field go above it, in declaration order and
    // before the field's own documentation.
    let mut anchored: Vec<Vec<String>> = vec![Vec::new(); out.fields.len()];
    for constant in &message.constants {
        losses.push(LossRecord::new(
            LossKind::ConstantAsComment,
            &message.name,
            None,
            format!("{} {} = {}", constant.ty, constant.name, constant.value),
        ));
        let mut lines = constant.comments.clone();
        lines.push(format!("{} = {}", constant.name, constant.value));
        match constant.anchor.filter(|i| *i < out.fields.len()) {
            Some(i) => anchored[i].extend(lines),
            None => out.comments.extend(lines),
        }
    }
    for (field, mut prefix) in out.fields.iter_mut().zip(anchored) {
        prefix.append(&mut field.comments);
        field.comments = prefix;
    }

    out
}

/// Build a proto enum from a group of ROS integer constants.
///
/// Constants that are not integers are skipped. The result always starts
/// with a zero value, see [`ensure_zero_first`].
pub fn constants_to_enum(name: &str, constants: &[Constant]) -> EnumType {
    let values = constants
        .iter()
        .filter(|c| c.ty.is_integer())
        .filter_map(|c| {
            let number = parse_integer(&c.value)?;
            let mut value = EnumValue::new(&c.name, number);
            value.comments = c.comments.clone();
            Some(value)
        })
        .collect();
    ensure_zero_first(&EnumType {
        name: name.to_string(),
        values,
        comments: Vec::new(),
    })
}

/// proto3 requires the first enum value to be zero.
///
/// An existing zero value is moved to the front; otherwise a synthetic
/// `<ENUM>_UNSPECIFIED = 0` is inserted.
pub fn ensure_zero_first(def: &EnumType) -> EnumType {
    let mut out = def.clone();
    match out.values.iter().position(|v| v.number == 0) {
        Some(0) => {}
        Some(i) => {
            let zero = out.values.remove(i);
            out.values.insert(0, zero);
        }
        None => {
            let name = format!("{}_UNSPECIFIED", to_upper_snake_case(&def.name));
            out.values.insert(0, EnumValue::new(name, 0));
        }
    }
    out
}

fn parse_integer(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    i32::try_from(if negative { -value } else { value }).ok()
}
