//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchClient`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use flex_shared::{BulkOperation, BulkResponse, DocumentAddress, IndexTarget};
use opensearch::{
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetMappingParts,
        IndicesPutMappingParts,
    },
    params::{Refresh, VersionType},
    BulkParts, CountParts, DeleteParts, IndexParts, OpenSearch, SearchParts, UpdateParts,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::FlexError;
use crate::interfaces::SearchClient;
use crate::opensearch::index_config::{index_creation_body, physical_index_name, IndexConfig};

/// OpenSearch provider implementation.
///
/// Documents of each (collection, category) pair live in their own physical
/// index; see [`physical_index_name`].
///
/// # Example
///
/// ```ignore
/// use flex_repository::opensearch::{IndexConfig, OpenSearchProvider};
/// use flex_shared::DocumentAddress;
///
/// let provider = OpenSearchProvider::new("http://localhost:9200", IndexConfig::default()).await?;
///
/// let address = DocumentAddress::new("blog", "articles", Some(42.into()));
/// let mut document = serde_json::Map::new();
/// document.insert("title".to_string(), "Rust traits".into());
/// provider.index_document(&address, &document, None).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - Settings used when a physical index is created
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(FlexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, FlexError> {
        let parsed_url = Url::parse(url).map_err(|e| FlexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| FlexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            shards = index_config.number_of_shards,
            replicas = index_config.number_of_replicas,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Check that the cluster answers a ping.
    pub async fn ping(&self) -> Result<(), FlexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| FlexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(FlexError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }

        Ok(())
    }

    fn refresh(&self) -> Option<Refresh> {
        self.index_config.refresh.then_some(Refresh::True)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, FlexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| FlexError::mapping(e.to_string()))?;

        Ok(response.status_code().is_success())
    }
}

fn require_id(address: &DocumentAddress) -> Result<String, FlexError> {
    address
        .document_id()
        .ok_or_else(|| FlexError::validation(format!("Document {} has no key", address)))
}

/// Map a failed document write to an error.
///
/// 404 and 409 become the typed not-found and conflict errors the service
/// knows how to absorb; anything else is wrapped with `make`.
fn document_error(
    status: u16,
    address: &DocumentAddress,
    body: &str,
    action: &str,
    make: fn(String) -> FlexError,
) -> FlexError {
    match status {
        404 => FlexError::document_not_found(address),
        409 => FlexError::version_conflict(address),
        _ => make(format!("{} failed with status {}: {}", action, status, body)),
    }
}

/// Read a document write response, returning its JSON body on success.
async fn document_response(
    response: Response,
    address: &DocumentAddress,
    action: &str,
    make: fn(String) -> FlexError,
) -> Result<Value, FlexError> {
    let status = response.status_code();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        if !matches!(status.as_u16(), 404 | 409) {
            error!(status = %status, body = %error_body, address = %address, "{} request failed", action);
        }
        return Err(document_error(
            status.as_u16(),
            address,
            &error_body,
            action,
            make,
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| FlexError::parse(e.to_string()))
}

/// Read a non-document response, returning its JSON body on success.
async fn json_response(
    response: Response,
    action: &str,
    make: fn(String) -> FlexError,
) -> Result<Value, FlexError> {
    let status = response.status_code();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, "{} request failed", action);
        return Err(make(format!(
            "{} failed with status {}: {}",
            action, status, error_body
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| FlexError::parse(e.to_string()))
}

/// Build the newline-delimited bulk body: an action line per operation,
/// followed by the document for index actions.
fn bulk_body(operations: &[BulkOperation]) -> Vec<Value> {
    let mut body = Vec::with_capacity(operations.len() * 2);

    for operation in operations {
        let mut meta = Map::new();
        meta.insert(
            "_index".to_string(),
            Value::String(physical_index_name(&operation.address.target)),
        );
        if let Some(id) = operation.address.document_id() {
            meta.insert("_id".to_string(), Value::String(id));
        }

        body.push(json!({ operation.action.as_str(): meta }));
        if let Some(source) = &operation.source {
            body.push(Value::Object(source.clone()));
        }
    }

    body
}

fn empty_search_response() -> Value {
    json!({
        "took": 0,
        "hits": {"total": {"value": 0}, "max_score": null, "hits": []}
    })
}

#[async_trait]
impl SearchClient for OpenSearchProvider {
    /// Create or replace a document.
    ///
    /// Without a key the engine assigns the id. With a version the write uses
    /// `version_type=external`: a greater version replaces the document, a
    /// missing document is created, and an equal or lower version is a 409
    /// mapped to `VersionConflict`.
    async fn index_document(
        &self,
        address: &DocumentAddress,
        document: &Map<String, Value>,
        version: Option<i64>,
    ) -> Result<Value, FlexError> {
        let index = physical_index_name(&address.target);
        let doc_id = address.document_id();

        let parts = match &doc_id {
            Some(id) => IndexParts::IndexId(&index, id),
            None => IndexParts::Index(&index),
        };

        let mut request = self.client.index(parts).body(Value::Object(document.clone()));
        if let Some(version) = version {
            request = request.version(version).version_type(VersionType::External);
        }
        if let Some(refresh) = self.refresh() {
            request = request.refresh(refresh);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FlexError::index(e.to_string()))?;

        let ack = document_response(response, address, "Index", FlexError::IndexError).await?;

        debug!(index = %index, doc_id = ?doc_id, version = ?version, "Document indexed");
        Ok(ack)
    }

    /// Partially update an existing document. Does not upsert.
    async fn update_document(
        &self,
        address: &DocumentAddress,
        partial: &Map<String, Value>,
    ) -> Result<Value, FlexError> {
        let index = physical_index_name(&address.target);
        let doc_id = require_id(address)?;

        let mut request = self
            .client
            .update(UpdateParts::IndexId(&index, &doc_id))
            .body(json!({ "doc": partial }));
        if let Some(refresh) = self.refresh() {
            request = request.refresh(refresh);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FlexError::update(e.to_string()))?;

        let ack = document_response(response, address, "Update", FlexError::UpdateError).await?;

        debug!(index = %index, doc_id = %doc_id, "Document updated");
        Ok(ack)
    }

    async fn delete_document(&self, address: &DocumentAddress) -> Result<Value, FlexError> {
        let index = physical_index_name(&address.target);
        let doc_id = require_id(address)?;

        let mut request = self.client.delete(DeleteParts::IndexId(&index, &doc_id));
        if let Some(refresh) = self.refresh() {
            request = request.refresh(refresh);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FlexError::delete(e.to_string()))?;

        let ack = document_response(response, address, "Delete", FlexError::DeleteError).await?;

        debug!(index = %index, doc_id = %doc_id, "Document deleted");
        Ok(ack)
    }

    /// Send all operations in one bulk request.
    ///
    /// Item failures are reported in the response, not as an error.
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkResponse, FlexError> {
        let body: Vec<JsonBody<Value>> = bulk_body(operations)
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let mut request = self.client.bulk(BulkParts::None).body(body);
        if let Some(refresh) = self.refresh() {
            request = request.refresh(refresh);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FlexError::bulk(e.to_string()))?;

        let value = json_response(response, "Bulk", FlexError::BulkError).await?;
        let bulk: BulkResponse = serde_json::from_value(value)
            .map_err(|e| FlexError::parse(format!("Failed to parse bulk response: {}", e)))?;

        debug!(
            operations = operations.len(),
            errors = bulk.errors,
            took = bulk.took,
            "Bulk request sent"
        );
        Ok(bulk)
    }

    /// Run a search. A missing index yields an empty result.
    async fn search(&self, target: &IndexTarget, body: &Value) -> Result<Value, FlexError> {
        let index = physical_index_name(target);

        let response = self
            .client
            .search(SearchParts::Index(&[&index]))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| FlexError::search(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            debug!(index = %index, "Search on missing index");
            return Ok(empty_search_response());
        }

        json_response(response, "Search", FlexError::SearchError).await
    }

    /// Count matching documents. A missing index counts as zero.
    async fn count(&self, target: &IndexTarget, body: &Value) -> Result<u64, FlexError> {
        let index = physical_index_name(target);

        let response = self
            .client
            .count(CountParts::Index(&[&index]))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| FlexError::search(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Ok(0);
        }

        let value = json_response(response, "Count", FlexError::SearchError).await?;
        value
            .get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| FlexError::parse("Count response has no count"))
    }

    /// Fetch the mapping. A missing index yields `{}`.
    async fn get_mapping(&self, target: &IndexTarget) -> Result<Value, FlexError> {
        let index = physical_index_name(target);

        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[&index]))
            .send()
            .await
            .map_err(|e| FlexError::mapping(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Ok(json!({}));
        }

        json_response(response, "Get mapping", FlexError::MappingError).await
    }

    /// Store the mapping, creating the physical index when it does not exist.
    async fn put_mapping(&self, target: &IndexTarget, mapping: &Value) -> Result<Value, FlexError> {
        let index = physical_index_name(target);

        let sent = if self.index_exists(&index).await? {
            self.client
                .indices()
                .put_mapping(IndicesPutMappingParts::Index(&[&index]))
                .body(mapping.clone())
                .send()
                .await
        } else {
            info!(index = %index, "Creating index");
            self.client
                .indices()
                .create(IndicesCreateParts::Index(&index))
                .body(index_creation_body(&self.index_config, mapping))
                .send()
                .await
        };
        let response = sent.map_err(|e| FlexError::mapping(e.to_string()))?;

        json_response(response, "Put mapping", FlexError::MappingError).await
    }

    /// Drop the physical index, mapping and documents alike.
    async fn delete_mapping(&self, target: &IndexTarget) -> Result<Value, FlexError> {
        let index = physical_index_name(target);

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[&index]))
            .send()
            .await
            .map_err(|e| FlexError::mapping(e.to_string()))?;

        json_response(response, "Delete mapping", FlexError::MappingError).await
    }
}
