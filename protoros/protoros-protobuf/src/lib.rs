//! Protobuf side of `protoros`.
//!
//! The proto grammar is never parsed here: `protoc` produces
//! `FileDescriptorProto`s and this crate adapts them to and from the schema
//! model. [`render_proto`] writes `.proto` text for the ROS→proto direction.

mod comments;
mod descriptor;
mod error;
mod render;

pub use descriptor::{
    file_descriptor, file_skeleton, from_descriptor, schema_from_file_descriptor, to_descriptor,
};
pub use error::DescriptorError;
pub use protoros_core::{proto_file_name, to_snake_case};
pub use render::{GENERATED_HEADER, render_proto};
