//! Flex error types.
//!
//! This module defines the unified error type for document sync, query and
//! mapping operations, covering both backend failures and the two expected
//! conditions (missing document, version conflict) that the service absorbs.

use thiserror::Error;

/// Unified errors from search and sync operations.
///
/// Returned by the `SearchClient` trait and by `FlexService`. The provider
/// reports `DocumentNotFound` and `VersionConflict` as errors; the service
/// turns them into a `WriteOutcome` where a missing document or a stale
/// version is an expected result.
#[derive(Debug, Clone, Error)]
pub enum FlexError {
    /// Validation error (e.g., missing document id, empty field list).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to index a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to update a document.
    #[error("Update error: {0}")]
    UpdateError(String),

    /// Failed to delete a document.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// The bulk request as a whole was rejected.
    #[error("Bulk error: {0}")]
    BulkError(String),

    /// Failed to execute a search or count request.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Failed to read or change a mapping.
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// Failed to parse response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize or hydrate entity data.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// The stored document version does not match the expected one.
    #[error("Version conflict: {0}")]
    VersionConflict(String),

    /// The persistence layer failed to save or delete the entity.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl FlexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create an update error.
    pub fn update(msg: impl Into<String>) -> Self {
        Self::UpdateError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a bulk error.
    pub fn bulk(msg: impl Into<String>) -> Self {
        Self::BulkError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create a mapping error.
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::MappingError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a document not found error.
    pub fn document_not_found(address: impl std::fmt::Display) -> Self {
        Self::DocumentNotFound(address.to_string())
    }

    /// Create a version conflict error.
    pub fn version_conflict(address: impl std::fmt::Display) -> Self {
        Self::VersionConflict(address.to_string())
    }

    /// Create a persistence error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict(_))
    }
}

impl From<serde_json::Error> for FlexError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
