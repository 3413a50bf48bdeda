//! ROS `.msg` support for `protoros`.
//!
//! # Pipeline
//!
//! ```text
//! .msg text
//!   └─ parse_line   – nom line grammar → Line (blank | comment | constant | field)
//!       └─ parse    – Line sequence → SchemaFile (TypeRefs still unresolved)
//!
//! MessageType (ROS-flavored, after map_to_ros)
//!   └─ render_ros   – .msg text with the generated-file header
//! ```

mod grammar;
mod parser;
mod render;

pub use grammar::{
    ArraySuffix, BaseType, ConstantDecl, FieldDecl, Line, LineError, TypeSpec, parse_line,
};
pub use parser::parse;
pub use protoros_core::ros_file_name;
pub use render::{GENERATED_HEADER, render_ros};
