//! Error types for the store layer and for the client service contract.
//!
//! Two error families live here:
//!
//! - [`StoreError`] is what a [`StoreBackend`](crate::backend::StoreBackend) reports. It never
//!   crosses the service boundary.
//! - [`ClientServiceError`] is what callers of [`ClientApi`](crate::api::ClientApi) see. Every
//!   store failure is mapped into it exactly once.

use bson::error::Error as BsonError;
use thiserror::Error;

use crate::ids::BusinessId;

/// Errors raised by a document store backend or by document encoding.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Conversion between a typed document and BSON failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The document does not have the structure the store or the caller expected.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A document with the given `_id` already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DuplicateKey(String, String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Coarse classification of a [`ClientServiceError`], for transports that
/// translate errors into status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Internal,
    DeadlineExceeded,
}

/// The error taxonomy of the client service contract.
///
/// Callers can always tell bad input, a missing record, a backend failure,
/// and an elapsed deadline apart. Raw store errors are never exposed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientServiceError {
    /// A caller-supplied identifier is not a well-formed storage key.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// No record matches the given key.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The store failed, or returned something the mapping layer cannot interpret.
    #[error("Internal error: {0}")]
    Internal(String),
    /// The caller's deadline elapsed before the store operation completed.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),
}

/// A specialized `Result` type for client service operations.
pub type ServiceResult<T> = Result<T, ClientServiceError>;

impl ClientServiceError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientServiceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ClientServiceError::NotFound(_) => ErrorKind::NotFound,
            ClientServiceError::Internal(_) => ErrorKind::Internal,
            ClientServiceError::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
        }
    }

    /// Wraps a store failure that happened while performing `action`.
    pub(crate) fn internal(action: &str, err: StoreError) -> Self {
        ClientServiceError::Internal(format!("Failed to {action}: {err}"))
    }

    pub(crate) fn client_not_found() -> Self {
        ClientServiceError::NotFound("Client not found".to_string())
    }

    /// The storage id exists but belongs to a record with another client id.
    pub(crate) fn client_id_mismatch(client_id: &BusinessId) -> Self {
        ClientServiceError::NotFound(format!("Client id {:?} does not match the stored record", client_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ClientServiceError::InvalidArgument("x".into()).kind(), ErrorKind::InvalidArgument);
        assert_eq!(ClientServiceError::client_not_found().kind(), ErrorKind::NotFound);
        assert_eq!(ClientServiceError::DeadlineExceeded("x".into()).kind(), ErrorKind::DeadlineExceeded);
    }

    #[test]
    fn store_errors_become_internal_with_context() {
        let err = ClientServiceError::internal("create client", StoreError::Backend("connection reset".into()));

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(
            err.to_string(),
            "Internal error: Failed to create client: Backend error: connection reset"
        );
    }
}
