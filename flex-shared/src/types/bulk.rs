//! Bulk request and response types.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::document::DocumentAddress;

/// Action of a single bulk entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Create or replace the document.
    Index,
    /// Remove the document.
    Delete,
}

impl BulkAction {
    /// The action name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Delete => "delete",
        }
    }
}

/// One entry of a bulk request.
///
/// Index operations carry the full document; delete operations carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOperation {
    pub action: BulkAction,
    pub address: DocumentAddress,
    pub source: Option<Map<String, Value>>,
}

impl BulkOperation {
    pub fn index(address: DocumentAddress, source: Map<String, Value>) -> Self {
        Self {
            action: BulkAction::Index,
            address,
            source: Some(source),
        }
    }

    pub fn delete(address: DocumentAddress) -> Self {
        Self {
            action: BulkAction::Delete,
            address,
            source: None,
        }
    }
}

/// Raw bulk response.
///
/// Per-item results are kept verbatim; [`BulkResponse::summary`] derives an
/// aggregate view without discarding anything.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Result of a bulk operation for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResult {
    /// The action the engine reported for this item.
    pub action: String,
    /// The document id, when reported.
    pub id: Option<String>,
    /// HTTP status of the item.
    pub status: u16,
    /// Whether the item succeeded.
    pub success: bool,
    /// Error reason if the item failed.
    pub error: Option<String>,
}

/// Summary of a bulk operation containing aggregate statistics and individual results.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful items.
    pub succeeded: usize,
    /// Number of failed items.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BulkItemResult>,
}

impl BulkResponse {
    /// Summarize the per-item results.
    ///
    /// A delete of a missing document (status 404, result `not_found`) counts
    /// as succeeded.
    pub fn summary(&self) -> BulkSummary {
        let results: Vec<BulkItemResult> = self.items.iter().filter_map(parse_item).collect();
        let succeeded = results.iter().filter(|item| item.success).count();

        BulkSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

fn parse_item(item: &Value) -> Option<BulkItemResult> {
    let (action, detail) = item.as_object()?.iter().next()?;

    let status = detail
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|status| u16::try_from(status).ok())
        .unwrap_or(0);
    let id = detail.get("_id").and_then(Value::as_str).map(str::to_string);
    let error = detail.get("error").map(|error| {
        error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string())
    });
    let not_found_delete = action == "delete" && status == 404;

    Some(BulkItemResult {
        action: action.clone(),
        id,
        status,
        success: error.is_none() && ((200..300).contains(&status) || not_found_delete),
        error,
    })
}
