//! Language-neutral schema model and type mapping for `protoros`.
//!
//! This crate has no knowledge of either surface syntax. The ROS parser and
//! the descriptor adapter build [`SchemaFile`]s; [`SymbolTable`] and
//! [`resolve`] bind type references across a batch; [`map_to_ros`] and
//! [`map_to_proto`] convert between the two flavors and report every
//! discarded detail as a [`LossRecord`].

mod error;
mod loss;
mod mapping;
mod model;
mod naming;
mod policy;
mod scalar;
mod symbols;

pub use error::{
    AmbiguousReferenceError, Construct, DecodeError, DuplicateNameError, ParseError, TranslateError,
    UnresolvedReferenceError, UnsupportedConstructError,
};
pub use loss::{LossKind, LossRecord};
pub use mapping::{
    Translation, constants_to_enum, enum_scalar, enum_to_constants, ensure_zero_first, map_to_proto,
    map_to_ros,
};
pub use model::{
    Bound, Constant, EnumType, EnumValue, Field, MessageType, Repetition, SchemaFile, Syntax,
    TypeName, TypeRef,
};
pub use naming::{proto_file_name, ros_file_name, to_snake_case, to_upper_snake_case};
pub use policy::{EnumRepr, MappingPolicy};
pub use scalar::{ScalarType, WellKnownType};
pub use symbols::{Symbol, SymbolKind, SymbolTable, resolve};
