//! Error types for building job descriptors.

use nomad_run_id::IdError;
use thiserror::Error;

/// Errors raised while turning raw inputs into a [`crate::JobDescriptor`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobSpecError {
    /// The job id or one of the ports is invalid.
    #[error("{field}: {source}")]
    Invalid {
        field: &'static str,
        #[source]
        source: IdError,
    },

    /// The image reference is empty.
    #[error("image-url cannot be empty")]
    EmptyImage,

    /// The image reference contains whitespace or a control character.
    #[error("image-url contains invalid character {ch:?}")]
    InvalidImageCharacter { ch: char },
}
