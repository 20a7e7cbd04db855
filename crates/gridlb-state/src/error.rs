//! Error types for the gridlb cluster state.

use thiserror::Error;

/// Result type alias for cluster state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while loading, saving or validating cluster state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}
