//! Structured records of information discarded by a lossy mapping step.

use std::fmt;

/// The rule of the mapping table that discarded something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossKind {
    /// `T[N]` / `T[<=N]` / `string<=N` became unbounded.
    BoundDiscarded,
    /// A scalar crossed over to a wider or differently encoded scalar.
    ScalarWidened,
    /// A nested proto message became a sibling ROS message.
    NestingFlattened,
    /// A proto enum became a group of integer constants.
    EnumFlattened,
    /// A proto enum no message field refers to was not emitted.
    EnumDropped,
    /// A ROS constant became a comment in the generated proto.
    ConstantAsComment,
    /// A field default value was dropped.
    DefaultDropped,
    /// proto3 `optional` presence tracking has no ROS counterpart.
    PresenceDropped,
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LossKind::BoundDiscarded => "bound discarded",
            LossKind::ScalarWidened => "scalar widened",
            LossKind::NestingFlattened => "nesting flattened",
            LossKind::EnumFlattened => "enum flattened",
            LossKind::EnumDropped => "enum dropped",
            LossKind::ConstantAsComment => "constant as comment",
            LossKind::DefaultDropped => "default dropped",
            LossKind::PresenceDropped => "presence dropped",
        };
        f.write_str(s)
    }
}

/// What was dropped, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossRecord {
    pub kind: LossKind,
    /// Message the loss occurred in (or the enum name for enum losses).
    pub message: String,
    pub field: Option<String>,
    /// Human-readable description of the discarded information.
    pub detail: String,
}

impl LossRecord {
    pub fn new(kind: LossKind, message: &str, field: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.to_string(),
            field: field.map(ToString::to_string),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for LossRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}.{}: {}: {}", self.message, field, self.kind, self.detail),
            None => write!(f, "{}: {}: {}", self.message, self.kind, self.detail),
        }
    }
}
