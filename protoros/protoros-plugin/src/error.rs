//! Error types for the plugin protocol handler.

use protoros_core::{DecodeError, TranslateError};

/// A single input file could not be generated.
///
/// Recovered per file: the handler reports it and keeps going with the
/// other files of the request.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Writing generated text into a `String` failed.
    #[error("failed to render output: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that end a plugin invocation.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The request could not be read or decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A file failed while the `strict` option was set.
    #[error("{file}: {source}")]
    Strict {
        file: String,
        #[source]
        source: GenerateError,
    },

    /// The response could not be written.
    #[error("failed to write code generator response: {0}")]
    Io(#[from] std::io::Error),
}
