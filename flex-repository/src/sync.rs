//! Document sync for single entities.
//!
//! Writes an entity's document around its persistence lifecycle. "Not found"
//! and "version conflict" replies are reported through [`WriteOutcome`]
//! where they are expected; every other failure is returned as an error.

use flex_shared::{to_document, Fields, WriteOutcome};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::errors::FlexError;
use crate::indexable::Indexable;
use crate::interfaces::EntityStore;
use crate::service::FlexService;

impl FlexService {
    /// Index the entity, creating or replacing its document.
    ///
    /// The body is the entity's `document_fields` with date-times in canonical
    /// form. An entity without a key is indexed under an engine-assigned id.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The engine's raw acknowledgement
    /// * `Err(FlexError)` - If the write fails
    #[instrument(skip(self, entity), fields(table = entity.table()))]
    pub async fn index<T: Indexable>(&self, entity: &T) -> Result<Value, FlexError> {
        let address = self.address(entity);
        let document = to_document(entity.document_fields());

        let ack = self
            .client()
            .index_document(&address, &document, None)
            .await?;

        debug!(address = %address, "Document indexed");
        Ok(ack)
    }

    /// Update the entity's document with a partial body.
    ///
    /// Uses `fields` when given and non-empty, else the entity's dirty
    /// attributes. With neither, nothing is sent and `Unchanged` is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(WriteOutcome::Written)` - The document was updated
    /// * `Ok(WriteOutcome::Unchanged)` - There was nothing to update
    /// * `Ok(WriteOutcome::NotFound)` - The document does not exist
    /// * `Err(FlexError)` - If the update fails for any other reason
    #[instrument(skip(self, entity, fields), fields(table = entity.table()))]
    pub async fn update_index<T: Indexable>(
        &self,
        entity: &T,
        fields: Option<Fields>,
    ) -> Result<WriteOutcome, FlexError> {
        let fields = match fields {
            Some(fields) if !fields.is_empty() => fields,
            _ => entity.dirty_attributes(),
        };

        if fields.is_empty() {
            return Ok(WriteOutcome::Unchanged);
        }

        let address = self.address(entity);
        let partial = to_document(fields);

        match self.client().update_document(&address, &partial).await {
            Ok(ack) => {
                debug!(address = %address, fields = partial.len(), "Document updated");
                Ok(WriteOutcome::Written(ack))
            }
            Err(FlexError::DocumentNotFound(_)) => {
                debug!(address = %address, "Document to update not found");
                Ok(WriteOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the entity's document. A missing document yields `NotFound`.
    #[instrument(skip(self, entity), fields(table = entity.table()))]
    pub async fn remove_index<T: Indexable>(&self, entity: &T) -> Result<WriteOutcome, FlexError> {
        let address = self.address(entity);

        match self.client().delete_document(&address).await {
            Ok(ack) => {
                debug!(address = %address, "Document removed");
                Ok(WriteOutcome::Written(ack))
            }
            Err(FlexError::DocumentNotFound(_)) => Ok(WriteOutcome::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Remove then index the entity's document.
    ///
    /// Always two calls, in that order. The pair is not atomic: if indexing
    /// fails the document stays absent until the next sync.
    pub async fn reindex<T: Indexable>(&self, entity: &T) -> Result<Value, FlexError> {
        let removed = self.remove_index(entity).await?;
        if removed.is_not_found() {
            debug!(address = %self.address(entity), "Reindexing a document that was not indexed");
        }

        self.index(entity).await
    }

    /// Index the entity under the externally managed `version`.
    ///
    /// The write only goes through when `version` is greater than the stored
    /// one; a document that does not exist yet is created. Passing the
    /// `_version` of a search hit unchanged therefore always conflicts.
    ///
    /// # Returns
    ///
    /// * `Ok(WriteOutcome::Written)` - The document was created or replaced
    /// * `Ok(WriteOutcome::Conflict)` - The stored version is equal or greater
    /// * `Ok(WriteOutcome::NotFound)` - The engine answered 404, e.g. the index is gone
    /// * `Err(FlexError)` - If the write fails for any other reason
    #[instrument(skip(self, entity), fields(table = entity.table()))]
    pub async fn index_with_version<T: Indexable>(
        &self,
        entity: &T,
        version: i64,
    ) -> Result<WriteOutcome, FlexError> {
        let address = self.address(entity);
        let document = to_document(entity.document_fields());

        match self
            .client()
            .index_document(&address, &document, Some(version))
            .await
        {
            Ok(ack) => Ok(WriteOutcome::Written(ack)),
            Err(FlexError::DocumentNotFound(_)) => Ok(WriteOutcome::NotFound),
            Err(FlexError::VersionConflict(_)) => {
                warn!(address = %address, version, "Version conflict on versioned index");
                Ok(WriteOutcome::Conflict)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the entity through `store`, keeping its document in sync when
    /// auto-index is enabled.
    ///
    /// A new entity is saved first and indexed afterwards, since its key is
    /// only known after the insert. An existing entity has its document
    /// updated with the dirty attributes; when that does not succeed the
    /// document is indexed in full, then the entity is saved.
    pub async fn save<T, S>(&self, entity: &mut T, store: &S) -> Result<(), FlexError>
    where
        T: Indexable,
        S: EntityStore<T> + ?Sized,
    {
        if !self.config().auto_index {
            return store.save(entity).await;
        }

        if entity.key().is_none() {
            store.save(entity).await?;
            self.index(entity).await?;
            return Ok(());
        }

        let outcome = self.update_index(entity, None).await?;
        if !outcome.is_success() {
            debug!(address = %self.address(entity), "Document missing on save, indexing in full");
            self.index(entity).await?;
        }

        store.save(entity).await
    }

    /// Delete the entity through `store`, removing its document first when
    /// auto-index is enabled.
    pub async fn delete<T, S>(&self, entity: &T, store: &S) -> Result<(), FlexError>
    where
        T: Indexable,
        S: EntityStore<T> + ?Sized,
    {
        if self.config().auto_index {
            self.remove_index(entity).await?;
        }

        store.delete(entity).await
    }
}
