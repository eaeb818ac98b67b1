//! Error types for identifier and port parsing.

use thiserror::Error;

/// Errors that can occur when parsing or validating job ids and ports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The job id string is empty.
    #[error("job id cannot be empty")]
    Empty,

    /// The job id exceeds the scheduler's length limit.
    #[error("job id is {len} characters long, at most {max} are allowed")]
    TooLong { len: usize, max: usize },

    /// The job id contains a control character.
    #[error("job id contains control character {ch:?}")]
    ControlCharacter { ch: char },

    /// The port value is not a valid non-zero TCP/UDP port.
    #[error("invalid port '{value}': {reason}")]
    InvalidPort { value: String, reason: &'static str },
}

impl IdError {
    /// Returns true if this error concerns a port rather than a job id.
    pub fn is_port_error(&self) -> bool {
        matches!(self, IdError::InvalidPort { .. })
    }
}
