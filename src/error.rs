//! Error types for simdex.

use thiserror::Error;

/// Errors that can occur during index lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Attempted to add a fingerprint after the index was finished.
    #[error("cannot add after finish")]
    AddAfterFinish,

    /// Attempted to query an index that has not been finished.
    #[error("index not finished")]
    NotFinished,
}

/// Result type alias for simdex operations.
pub type Result<T> = std::result::Result<T, IndexError>;
