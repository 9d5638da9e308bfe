//! Error types for the ledger core

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0} already exists")]
    DuplicateKey(String),

    #[error("Invalid reference: {0}")]
    Reference(String),

    #[error("Amount out of range: {0}")]
    Overflow(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    /// True for the errors caused by the user's input rather than the store.
    pub(crate) fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// True when a rusqlite error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) type Result<T> = std::result::Result<T, LedgerError>;
