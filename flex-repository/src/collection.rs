//! Bulk sync for collections of entities.
//!
//! Each operation sends a single bulk request. Per-item failures stay in the
//! returned [`BulkResponse`]; only a rejected request is an error.

use flex_shared::{to_document, BulkOperation, BulkResponse};
use tracing::{debug, instrument, warn};

use crate::errors::FlexError;
use crate::indexable::Indexable;
use crate::service::FlexService;

impl FlexService {
    /// Index every entity in one bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The slice was empty; nothing was sent
    /// * `Ok(Some(BulkResponse))` - The engine's per-item results
    /// * `Err(FlexError)` - If the request as a whole failed
    #[instrument(skip(self, entities), fields(count = entities.len()))]
    pub async fn bulk_index<T: Indexable>(
        &self,
        entities: &[T],
    ) -> Result<Option<BulkResponse>, FlexError> {
        let operations: Vec<BulkOperation> = entities
            .iter()
            .map(|entity| {
                BulkOperation::index(self.address(entity), to_document(entity.document_fields()))
            })
            .collect();

        self.send_bulk(operations).await
    }

    /// Remove every entity's document in one bulk request.
    #[instrument(skip(self, entities), fields(count = entities.len()))]
    pub async fn bulk_remove_index<T: Indexable>(
        &self,
        entities: &[T],
    ) -> Result<Option<BulkResponse>, FlexError> {
        let operations: Vec<BulkOperation> = entities
            .iter()
            .map(|entity| BulkOperation::delete(self.address(entity)))
            .collect();

        self.send_bulk(operations).await
    }

    /// Bulk remove, then bulk index. Two requests, not atomic.
    pub async fn bulk_reindex<T: Indexable>(
        &self,
        entities: &[T],
    ) -> Result<Option<BulkResponse>, FlexError> {
        self.bulk_remove_index(entities).await?;
        self.bulk_index(entities).await
    }

    async fn send_bulk(
        &self,
        operations: Vec<BulkOperation>,
    ) -> Result<Option<BulkResponse>, FlexError> {
        if operations.is_empty() {
            return Ok(None);
        }

        let response = self.client().bulk(&operations).await?;

        let summary = response.summary();
        if summary.failed > 0 {
            warn!(
                total = summary.total,
                failed = summary.failed,
                "Bulk request completed with item failures"
            );
        } else {
            debug!(total = summary.total, took = response.took, "Bulk request completed");
        }

        Ok(Some(response))
    }
}
