//! Language-neutral schema model shared by the ROS and Protobuf sides.
//!
//! A [`SchemaFile`] is built once per translated file (by the ROS parser or
//! the descriptor adapter) and is not mutated afterwards; the resolution pass
//! and the mappers always return a new value.

use std::fmt;

use crate::scalar::{ScalarType, WellKnownType};

/// Which interface-definition language a [`SchemaFile`] is flavored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Syntax {
    /// ROS `.msg` text: one flat message per file, no ordinals.
    #[default]
    RosMsg,
    /// Protobuf `proto3`.
    Proto3,
}

/// Root entity: one translated file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaFile {
    /// Source file name, e.g. `"nav/pose.proto"` or `"Pose.msg"`.
    pub name: String,
    pub syntax: Syntax,
    /// Package path, e.g. `["geometry_msgs"]` or `["my", "pkg"]`.
    pub package: Vec<String>,
    /// Other files referenced by this one (not owned).
    pub imports: Vec<String>,
    pub messages: Vec<MessageType>,
    /// Top-level enums.
    pub enums: Vec<EnumType>,
}

impl SchemaFile {
    pub fn new(name: impl Into<String>, syntax: Syntax) -> Self {
        Self {
            name: name.into(),
            syntax,
            ..Default::default()
        }
    }

    /// Replace the package path.
    pub fn with_package(mut self, package: Vec<String>) -> Self {
        self.package = package;
        self
    }

    /// Find a top-level message by name.
    pub fn message(&self, name: &str) -> Option<&MessageType> {
        self.messages.iter().find(|m| m.name == name)
    }
}

/// A message type with its (possibly nested) members.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageType {
    pub name: String,
    pub fields: Vec<Field>,
    /// Nested message types (proto only; ROS messages are always flat).
    pub nested_messages: Vec<MessageType>,
    /// Nested enums (proto only).
    pub nested_enums: Vec<EnumType>,
    /// Typed constants (ROS only).
    pub constants: Vec<Constant>,
    /// Documentation lines attached to the message itself.
    pub comments: Vec<String>,
}

impl MessageType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Whether a field holds one value or a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Repetition {
    #[default]
    Singular,
    Repeated,
}

/// A length bound seen in ROS source and folded away during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// `T[N]`
    FixedArray(usize),
    /// `T[<=N]`
    BoundedArray(usize),
    /// `string<=N`
    BoundedString(usize),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::FixedArray(n) => write!(f, "[{n}]"),
            Bound::BoundedArray(n) => write!(f, "[<={n}]"),
            Bound::BoundedString(n) => write!(f, "string<={n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    pub repetition: Repetition,
    /// proto3 `optional`: the field tracks explicit presence.
    pub optional: bool,
    /// Protobuf tag; `None` for ROS fields.
    pub ordinal: Option<u32>,
    /// Default value as written in the source.
    pub default: Option<String>,
    /// Bounds that were parsed but do not survive into the model's
    /// repetition kind. The mapper reports them as losses.
    pub bounds: Vec<Bound>,
    /// Documentation lines rendered above the field.
    pub comments: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            repetition: Repetition::Singular,
            optional: false,
            ordinal: None,
            default: None,
            bounds: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repetition = Repetition::Repeated;
        self
    }

    pub fn with_ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.repetition == Repetition::Repeated
    }
}

/// Reference to the type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Scalar(ScalarType),
    /// A reference exactly as written in the source and not yet resolved:
    /// `"Pose"`, `"geometry_msgs/Pose"` (ROS) or `".pkg.Outer.Inner"` (proto).
    Named(String),
    Message(TypeName),
    Enum(TypeName),
    WellKnown(WellKnownType),
}

impl TypeRef {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, TypeRef::Named(_))
    }
}

/// Fully qualified name of a message or enum.
///
/// `path` has more than one segment only for proto types nested inside
/// another message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeName {
    pub package: Vec<String>,
    pub path: Vec<String>,
}

impl TypeName {
    pub fn new(package: Vec<String>, path: Vec<String>) -> Self {
        Self { package, path }
    }

    /// Innermost type name.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Dotted form without a leading dot, e.g. `"pkg.Outer.Inner"`.
    pub fn qualified(&self) -> String {
        self.package
            .iter()
            .chain(self.path.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Name of the enclosing type for a nested type.
    pub fn parent(&self) -> Option<TypeName> {
        if self.path.len() < 2 {
            return None;
        }
        Some(TypeName {
            package: self.package.clone(),
            path: self.path[..self.path.len() - 1].to_vec(),
        })
    }

    pub fn child(&self, name: &str) -> TypeName {
        let mut path = self.path.clone();
        path.push(name.to_string());
        TypeName {
            package: self.package.clone(),
            path,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub comments: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, values: &[(&str, i32)]) -> Self {
        Self {
            name: name.into(),
            values: values
                .iter()
                .map(|(n, v)| EnumValue::new(*n, *v))
                .collect(),
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub comments: Vec<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
            comments: Vec::new(),
        }
    }
}

/// A ROS constant: `TYPE NAME=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub ty: ScalarType,
    /// Literal value as it appeared in the source.
    pub value: String,
    /// Index of the field declared right after this constant, `None` when
    /// no field follows it.
    pub anchor: Option<usize>,
    pub comments: Vec<String>,
}

impl Constant {
    pub fn new(name: impl Into<String>, ty: ScalarType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            value: value.into(),
            anchor: None,
            comments: Vec::new(),
        }
    }
}
