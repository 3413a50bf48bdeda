//! Generators turn one requested `FileDescriptorProto` into output files.

mod json;
mod msg;

pub use json::JsonGenerator;
pub use msg::MsgGenerator;
use prost_types::{FileDescriptorProto, compiler::code_generator_response};
use protoros_core::SymbolTable;

use crate::{GenerateError, PluginOptions};

/// One output file of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the plugin's output directory.
    pub name: String,
    pub content: String,
}

impl From<GeneratedFile> for code_generator_response::File {
    fn from(file: GeneratedFile) -> Self {
        Self {
            name: Some(file.name),
            content: Some(file.content),
            ..Default::default()
        }
    }
}

/// Read-only state shared by every file of one request.
#[derive(Debug)]
pub struct GeneratorContext {
    /// Every type of every file in the request, imports included.
    pub symbols: SymbolTable,
    pub options: PluginOptions,
}

/// Output format of a plugin binary.
///
/// Implementations run on rayon workers, one call per requested file.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        file: &FileDescriptorProto,
        context: &GeneratorContext,
    ) -> Result<Vec<GeneratedFile>, GenerateError>;
}
