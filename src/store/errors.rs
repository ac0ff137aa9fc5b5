//! Store error types

use thiserror::Error;

use crate::storage::StorageError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures a [`UserStore`](super::UserStore) can surface.
///
/// Absence is never an error; these are all persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document file failed to read, write, or verify
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// A record could not be encoded to or decoded from its document body
    #[error("Document encoding error for '{id}': {source}")]
    Encoding {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A thread panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn encoding(id: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encoding {
            id: id.into(),
            source,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
