//! Translate between Protobuf schemas and ROS `.msg` files.
//!
//! - ROS → proto: [`translate_msg_batch`] parses a batch of `.msg` sources,
//!   resolves references across the batch and renders one `.proto` per
//!   message.
//! - proto → ROS: `protoc` compiles the `.proto` files and hands the
//!   descriptors to the [`plugin`] handler, which renders `.msg` files.
//!
//! The building blocks are re-exported as [`core`], [`rosmsg`] and
//! [`protobuf`].

mod batch;
mod error;

pub use batch::{MsgBatch, MsgResult, MsgSource, ProtoOutput, translate_msg_batch};
pub use error::BatchError;
pub use protoros_core as core;
#[cfg(feature = "plugin")]
pub use protoros_plugin as plugin;
pub use protoros_protobuf as protobuf;
pub use protoros_rosmsg as rosmsg;
