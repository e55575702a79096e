//! Error types for `numchunk`.
//!
//! This module provides a unified error type for chunk building, decoding and
//! publishing. Error codes follow the pattern `NCHK-XXX` for easy debugging.

use thiserror::Error;

/// Result type alias for `numchunk` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `numchunk` operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller broke a structural contract (NCHK-001).
    ///
    /// Raised when an accumulator is asked to grow past its chunk cap or when
    /// a chunk index is closed twice with different row counts. Never retried.
    #[error("[NCHK-001] Structural invariant violated: {0}")]
    StructuralInvariant(String),

    /// Exact integer read of a value that is not an integer (NCHK-002).
    #[error("[NCHK-002] Unsupported conversion at row {row}: {value} is not representable as i64")]
    UnsupportedConversion {
        /// Row that was read.
        row: usize,
        /// The decoded floating value.
        value: f64,
    },

    /// The storage collaborator failed to persist a chunk (NCHK-003).
    #[error("[NCHK-003] Persistence failure: {0}")]
    Persistence(String),

    /// Serialized chunk bytes do not match their declared layout (NCHK-004).
    #[error("[NCHK-004] Corrupt chunk: {0}")]
    CorruptChunk(String),

    /// Configuration error (NCHK-005).
    #[error("[NCHK-005] Configuration error: {0}")]
    Config(String),

    /// Internal error (NCHK-006).
    ///
    /// Indicates an unexpected internal error, such as a panicked background task.
    #[error("[NCHK-006] Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the error code (e.g., "NCHK-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::StructuralInvariant(_) => "NCHK-001",
            Self::UnsupportedConversion { .. } => "NCHK-002",
            Self::Persistence(_) => "NCHK-003",
            Self::CorruptChunk(_) => "NCHK-004",
            Self::Config(_) => "NCHK-005",
            Self::Internal(_) => "NCHK-006",
        }
    }

    /// Returns true if this error is recoverable.
    ///
    /// Contract breaches, corruption and internal errors are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::StructuralInvariant(_) | Self::CorruptChunk(_) | Self::Internal(_)
        )
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
