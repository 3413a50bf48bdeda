//! `protoc` plugin support for protoros.
//!
//! [`PluginHandler`] implements the code generator protocol: it decodes a
//! `CodeGeneratorRequest`, hands every requested file to a [`Generator`] and
//! encodes the `CodeGeneratorResponse`. Two generators are provided:
//!
//! - [`MsgGenerator`] translates each file to ROS `.msg` files.
//! - [`JsonGenerator`] dumps each file's messages and enums as JSON.
//!
//! ```no_run
//! use protoros_plugin::{MsgGenerator, PluginHandler, PluginOptions};
//!
//! let mut handler = PluginHandler::new(MsgGenerator, PluginOptions::default());
//! handler.run(std::io::stdin().lock(), std::io::stdout().lock())?;
//! # Ok::<(), protoros_plugin::PluginError>(())
//! ```

mod error;
mod generator;
mod handler;
mod options;

pub use error::{GenerateError, PluginError};
pub use generator::{GeneratedFile, Generator, GeneratorContext, JsonGenerator, MsgGenerator};
pub use handler::{HandlerState, Outcome, PluginHandler, decode_request};
pub use options::PluginOptions;
