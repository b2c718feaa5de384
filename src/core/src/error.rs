//! Error types shared by every user store backend
//!
//! The variants map one-to-one onto the failure categories a host has to
//! tell apart: bad input, missing key, duplicate key, corrupt persisted
//! record, and storage I/O.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UserStoreError>;

/// User store error
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// Missing or unrepresentable input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced user or group does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Create attempted on an existing key
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A persisted line could not be parsed
    #[error("Malformed record in {resource} at line {line}: {reason}")]
    MalformedRecord {
        resource: String,
        line: usize,
        reason: String,
    },

    /// Resource unreadable or unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UserStoreError {
    /// Build a malformed-record error
    pub fn malformed(resource: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            resource: resource.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
