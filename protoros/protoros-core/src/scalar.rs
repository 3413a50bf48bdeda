//! Scalar and well-known type tables for both IDLs.
//!
//! | ROS keyword        | proto keyword                  | lossless |
//! |--------------------|--------------------------------|----------|
//! | `bool`             | `bool`                         | yes      |
//! | `int32`            | `int32`                        | yes      |
//! | `int64`            | `int64`                        | yes      |
//! | `uint32`           | `uint32`                       | yes      |
//! | `uint64`           | `uint64`                       | yes      |
//! | `float32`          | `float`                        | yes      |
//! | `float64`          | `double`                       | yes      |
//! | `string`           | `string`                       | yes      |
//! | `int8`, `int16`    | `int32`                        | no       |
//! | `uint8`, `uint16`, `byte` | `uint32`                | no       |
//! | `char`, `wstring`  | `string`                       | no       |
//! | `int32`            | `sint32`, `sfixed32`           | no       |
//! | `int64`            | `sint64`, `sfixed64`           | no       |
//! | `uint32`           | `fixed32`                      | no       |
//! | `uint64`           | `fixed64`                      | no       |
//! | `string`           | `bytes`                        | no       |

use std::fmt;

/// Every scalar keyword of either language.
///
/// Variants shared by both languages map onto themselves; the others only
/// exist on one side and are folded onto a shared variant when crossing over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    // ROS only
    Byte,
    Char,
    Int8,
    Int16,
    UInt8,
    UInt16,
    WString,
    // proto only
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bytes,
}

impl ScalarType {
    /// ROS keyword, `None` for proto-only scalars.
    pub fn ros_keyword(&self) -> Option<&'static str> {
        let kw = match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::WString => "wstring",
            _ => return None,
        };
        Some(kw)
    }

    /// proto keyword, `None` for ROS-only scalars.
    pub fn proto_keyword(&self) -> Option<&'static str> {
        let kw = match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::String => "string",
            Self::SInt32 => "sint32",
            Self::SInt64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::SFixed32 => "sfixed32",
            Self::SFixed64 => "sfixed64",
            Self::Bytes => "bytes",
            _ => return None,
        };
        Some(kw)
    }

    pub fn from_ros_keyword(s: &str) -> Option<Self> {
        ROS_SCALARS
            .iter()
            .copied()
            .find(|t| t.ros_keyword() == Some(s))
    }

    pub fn from_proto_keyword(s: &str) -> Option<Self> {
        PROTO_SCALARS
            .iter()
            .copied()
            .find(|t| t.proto_keyword() == Some(s))
    }

    /// The scalar used on the ROS side. Returns `(mapped, lossless)`.
    pub fn to_ros(self) -> (Self, bool) {
        match self {
            Self::SInt32 | Self::SFixed32 => (Self::Int32, false),
            Self::SInt64 | Self::SFixed64 => (Self::Int64, false),
            Self::Fixed32 => (Self::UInt32, false),
            Self::Fixed64 => (Self::UInt64, false),
            Self::Bytes => (Self::String, false),
            other => (other, true),
        }
    }

    /// The scalar used on the proto side. Returns `(mapped, lossless)`.
    pub fn to_proto(self) -> (Self, bool) {
        match self {
            Self::Int8 | Self::Int16 => (Self::Int32, false),
            Self::UInt8 | Self::UInt16 | Self::Byte => (Self::UInt32, false),
            Self::Char | Self::WString => (Self::String, false),
            other => (other, true),
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(
            self,
            Self::Bool
                | Self::Float32
                | Self::Float64
                | Self::String
                | Self::WString
                | Self::Bytes
        )
    }
}

const ROS_SCALARS: [ScalarType; 15] = [
    ScalarType::Bool,
    ScalarType::Int32,
    ScalarType::Int64,
    ScalarType::UInt32,
    ScalarType::UInt64,
    ScalarType::Float32,
    ScalarType::Float64,
    ScalarType::String,
    ScalarType::Byte,
    ScalarType::Char,
    ScalarType::Int8,
    ScalarType::Int16,
    ScalarType::UInt8,
    ScalarType::UInt16,
    ScalarType::WString,
];

const PROTO_SCALARS: [ScalarType; 15] = [
    ScalarType::Bool,
    ScalarType::Int32,
    ScalarType::Int64,
    ScalarType::UInt32,
    ScalarType::UInt64,
    ScalarType::Float32,
    ScalarType::Float64,
    ScalarType::String,
    ScalarType::SInt32,
    ScalarType::SInt64,
    ScalarType::Fixed32,
    ScalarType::Fixed64,
    ScalarType::SFixed32,
    ScalarType::SFixed64,
    ScalarType::Bytes,
];

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kw = self
            .ros_keyword()
            .or_else(|| self.proto_keyword())
            .unwrap_or("?");
        f.write_str(kw)
    }
}

/// Message types that have a fixed counterpart in the other language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownType {
    Timestamp,
    Duration,
    Empty,
    DoubleValue,
    FloatValue,
    Int64Value,
    UInt64Value,
    Int32Value,
    UInt32Value,
    BoolValue,
    StringValue,
    BytesValue,
}

const WELL_KNOWN: [WellKnownType; 12] = [
    WellKnownType::Timestamp,
    WellKnownType::Duration,
    WellKnownType::Empty,
    WellKnownType::DoubleValue,
    WellKnownType::FloatValue,
    WellKnownType::Int64Value,
    WellKnownType::UInt64Value,
    WellKnownType::Int32Value,
    WellKnownType::UInt32Value,
    WellKnownType::BoolValue,
    WellKnownType::StringValue,
    WellKnownType::BytesValue,
];

impl WellKnownType {
    /// Fully-qualified proto name without a leading dot.
    pub fn proto_name(&self) -> &'static str {
        match self {
            Self::Timestamp => "google.protobuf.Timestamp",
            Self::Duration => "google.protobuf.Duration",
            Self::Empty => "google.protobuf.Empty",
            Self::DoubleValue => "google.protobuf.DoubleValue",
            Self::FloatValue => "google.protobuf.FloatValue",
            Self::Int64Value => "google.protobuf.Int64Value",
            Self::UInt64Value => "google.protobuf.UInt64Value",
            Self::Int32Value => "google.protobuf.Int32Value",
            Self::UInt32Value => "google.protobuf.UInt32Value",
            Self::BoolValue => "google.protobuf.BoolValue",
            Self::StringValue => "google.protobuf.StringValue",
            Self::BytesValue => "google.protobuf.BytesValue",
        }
    }

    /// The `.proto` file that must be imported to use this type.
    pub fn proto_import(&self) -> &'static str {
        match self {
            Self::Timestamp => "google/protobuf/timestamp.proto",
            Self::Duration => "google/protobuf/duration.proto",
            Self::Empty => "google/protobuf/empty.proto",
            _ => "google/protobuf/wrappers.proto",
        }
    }

    /// `pkg/Type` name of the ROS counterpart.
    pub fn ros_name(&self) -> &'static str {
        match self {
            Self::Timestamp => "builtin_interfaces/Time",
            Self::Duration => "builtin_interfaces/Duration",
            Self::Empty => "std_msgs/Empty",
            Self::DoubleValue => "std_msgs/Float64",
            Self::FloatValue => "std_msgs/Float32",
            Self::Int64Value => "std_msgs/Int64",
            Self::UInt64Value => "std_msgs/UInt64",
            Self::Int32Value => "std_msgs/Int32",
            Self::UInt32Value => "std_msgs/UInt32",
            Self::BoolValue => "std_msgs/Bool",
            Self::StringValue | Self::BytesValue => "std_msgs/String",
        }
    }

    /// Look up a proto type name, with or without the leading dot.
    pub fn from_proto_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('.').unwrap_or(name);
        WELL_KNOWN.iter().copied().find(|w| w.proto_name() == name)
    }

    /// Look up a ROS `pkg/Type` name. `std_msgs/String` maps back to
    /// `StringValue`; `BytesValue` is never produced from the ROS side.
    pub fn from_ros_name(name: &str) -> Option<Self> {
        WELL_KNOWN
            .iter()
            .copied()
            .filter(|w| *w != Self::BytesValue)
            .find(|w| w.ros_name() == name)
    }
}
