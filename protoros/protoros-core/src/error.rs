//! Error taxonomy for parsing, decoding, resolution and mapping.
//!
//! [`TranslateError`] covers the errors that are recovered per file: the
//! failing file is reported and its siblings keep translating.
//! [`DecodeError`] is fatal to a whole plugin invocation.

use std::fmt;

/// Malformed ROS message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{file}:{line}:{column}: {reason}: `{text}`")]
pub struct ParseError {
    pub file: String,
    /// 1-based line number; `0` when the file name itself is invalid.
    pub line: usize,
    /// 1-based column where the grammar gave up.
    pub column: usize,
    /// The offending line, verbatim.
    pub text: String,
    pub reason: String,
}

/// The serialized request could not be turned into descriptors.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("empty code generator request")]
    Empty,

    #[error("malformed code generator request: {source}")]
    Malformed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("file to generate '{name}' is missing from the request")]
    MissingFile { name: String },

    #[error("invalid plugin parameter '{parameter}': {detail}")]
    Parameter { parameter: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Constructs that the schema model cannot represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct {
    Oneof,
    Any,
    Extension,
    Option(String),
    Service,
    /// A file whose syntax is not `proto3`.
    Syntax(String),
    /// A `google.protobuf.*` type without a ROS counterpart.
    WellKnown(String),
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::Oneof => f.write_str("oneof"),
            Construct::Any => f.write_str("any"),
            Construct::Extension => f.write_str("extension"),
            Construct::Option(name) => write!(f, "option `{name}`"),
            Construct::Service => f.write_str("service"),
            Construct::Syntax(s) => write!(f, "syntax \"{s}\""),
            Construct::WellKnown(name) => write!(f, "well-known type `{name}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {construct} in '{file}'{}", location(.message, .field))]
pub struct UnsupportedConstructError {
    pub construct: Construct,
    pub file: String,
    pub message: Option<String>,
    pub field: Option<String>,
}

impl UnsupportedConstructError {
    pub fn new(construct: Construct, file: impl Into<String>) -> Self {
        Self {
            construct,
            file: file.into(),
            message: None,
            field: None,
        }
    }

    pub fn at(mut self, message: &str, field: Option<&str>) -> Self {
        self.message = Some(message.to_string());
        self.field = field.map(ToString::to_string);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unresolved type '{name}' in '{file}' (field `{message}.{field}`)")]
pub struct UnresolvedReferenceError {
    pub name: String,
    pub file: String,
    pub message: String,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ambiguous type '{name}' in '{file}': defined by {}", .candidates.join(", "))]
pub struct AmbiguousReferenceError {
    pub name: String,
    pub file: String,
    /// Files that define the colliding name.
    pub candidates: Vec<String>,
}

/// Two declarations of one generated ROS message share a name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate name `{name}` in '{file}' (message `{message}`): declared by {}", .sources.join(", "))]
pub struct DuplicateNameError {
    pub name: String,
    pub file: String,
    pub message: String,
    /// Where each colliding declaration came from, in declaration order.
    pub sources: Vec<String>,
}

/// Errors recovered at file granularity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstructError),

    #[error(transparent)]
    Unresolved(#[from] UnresolvedReferenceError),

    #[error(transparent)]
    Ambiguous(#[from] AmbiguousReferenceError),

    #[error(transparent)]
    Duplicate(#[from] DuplicateNameError),
}

fn location(message: &Option<String>, field: &Option<String>) -> String {
    match (message, field) {
        (Some(m), Some(f)) => format!(" (field `{m}.{f}`)"),
        (Some(m), None) => format!(" (message `{m}`)"),
        _ => String::new(),
    }
}
