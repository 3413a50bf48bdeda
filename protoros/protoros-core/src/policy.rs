use std::str::FromStr;

/// Scalar type used for the constants a proto enum is flattened into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumRepr {
    /// `uint8` when every value fits `0..=255`, otherwise `int32`.
    #[default]
    Auto,
    UInt8,
    Int32,
}

impl FromStr for EnumRepr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "uint8" => Ok(Self::UInt8),
            "int32" => Ok(Self::Int32),
            other => Err(format!(
                "unknown enum representation '{other}' (expected auto | uint8 | int32)"
            )),
        }
    }
}

/// Knobs for [`map_to_ros`](crate::map_to_ros).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MappingPolicy {
    pub enum_repr: EnumRepr,
}
