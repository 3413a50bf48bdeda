use protoros_core::{DecodeError, UnsupportedConstructError};

/// Failure to turn descriptor bytes into a schema file.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstructError),
}
