//! Error type for the batch pipeline.

use protoros_core::TranslateError;

/// Why one file of a batch produced no output.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("failed to render output: {0}")]
    Render(#[from] std::fmt::Error),
}
