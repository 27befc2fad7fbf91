//! Search client trait definition.
//!
//! This module defines the abstract interface for the search engine calls the
//! sync service needs, allowing different backend implementations (OpenSearch,
//! Elasticsearch, test doubles).

use async_trait::async_trait;
use flex_shared::{BulkOperation, BulkResponse, DocumentAddress, IndexTarget};
use serde_json::{Map, Value};

use crate::errors::FlexError;

/// Abstracts the underlying search engine client.
///
/// Implementations are shared behind an `Arc` by `FlexService`. Every method
/// performs exactly one round trip to the engine.
///
/// # Expected failures
///
/// A missing document must be reported as `FlexError::DocumentNotFound` and a
/// rejected versioned write as `FlexError::VersionConflict`, so the service
/// can tell them apart from real failures. All other failures use the remaining
/// `FlexError` variants.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Create or replace a document.
    ///
    /// When `address.key` is `None` the engine assigns the document id.
    ///
    /// When `version` is set the write uses external versioning: it is
    /// accepted only if `version` is greater than the stored version, and a
    /// missing document is created with that version. An equal or lower
    /// version is rejected as `VersionConflict`. The version is a counter
    /// owned by the caller, not the `_version` read back from a hit.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The engine's raw acknowledgement
    /// * `Err(FlexError)` - If the write fails
    async fn index_document(
        &self,
        address: &DocumentAddress,
        document: &Map<String, Value>,
        version: Option<i64>,
    ) -> Result<Value, FlexError>;

    /// Partially update an existing document with `{"doc": partial}`.
    ///
    /// This is not an upsert: a missing document yields `DocumentNotFound`.
    async fn update_document(
        &self,
        address: &DocumentAddress,
        partial: &Map<String, Value>,
    ) -> Result<Value, FlexError>;

    /// Delete a document. A missing document yields `DocumentNotFound`.
    async fn delete_document(&self, address: &DocumentAddress) -> Result<Value, FlexError>;

    /// Submit all operations in one bulk request.
    ///
    /// Per-item failures are part of the returned response, not errors.
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkResponse, FlexError>;

    /// Execute a search body verbatim and return the raw response.
    async fn search(&self, target: &IndexTarget, body: &Value) -> Result<Value, FlexError>;

    /// Execute a count request and return the number of matches.
    async fn count(&self, target: &IndexTarget, body: &Value) -> Result<u64, FlexError>;

    /// Fetch the mapping of a category. An unknown category yields an empty object.
    async fn get_mapping(&self, target: &IndexTarget) -> Result<Value, FlexError>;

    /// Define or extend the mapping of a category.
    async fn put_mapping(&self, target: &IndexTarget, mapping: &Value) -> Result<Value, FlexError>;

    /// Drop the mapping of a category together with its documents.
    async fn delete_mapping(&self, target: &IndexTarget) -> Result<Value, FlexError>;
}
