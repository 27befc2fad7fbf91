//! Mapping administration for an entity's category.

use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::errors::FlexError;
use crate::indexable::Indexable;
use crate::service::FlexService;

impl FlexService {
    /// The stored mapping for the entity's category, `{}` when there is none.
    pub async fn get_mapping<T: Indexable>(&self, entity: &T) -> Result<Value, FlexError> {
        self.client().get_mapping(&self.target(entity)).await
    }

    /// Store the entity's mapping properties for its category.
    ///
    /// The body is `{"_source": {"enabled": true}, "properties": ...}`.
    #[instrument(skip(self, entity), fields(table = entity.table()))]
    pub async fn put_mapping<T: Indexable>(&self, entity: &T) -> Result<Value, FlexError> {
        let target = self.target(entity);
        let mapping = mapping_body(entity.mapping_properties());

        let ack = self.client().put_mapping(&target, &mapping).await?;
        info!(target = %target, "Mapping stored");
        Ok(ack)
    }

    /// Drop the mapping, and with it every document of the category.
    #[instrument(skip(self, entity), fields(table = entity.table()))]
    pub async fn delete_mapping<T: Indexable>(&self, entity: &T) -> Result<Value, FlexError> {
        let target = self.target(entity);

        let ack = self.client().delete_mapping(&target).await?;
        info!(target = %target, "Mapping deleted");
        Ok(ack)
    }

    /// Whether a non-empty mapping is stored for the entity's category.
    pub async fn has_mapping<T: Indexable>(&self, entity: &T) -> Result<bool, FlexError> {
        let mapping = self.get_mapping(entity).await?;
        Ok(mapping_present(&mapping))
    }

    /// Drop the mapping when present, then store it again.
    ///
    /// Not atomic: between the two calls the category has no mapping.
    pub async fn rebuild_mapping<T: Indexable>(&self, entity: &T) -> Result<Value, FlexError> {
        if self.has_mapping(entity).await? {
            self.delete_mapping(entity).await?;
        }

        self.put_mapping(entity).await
    }
}

fn mapping_body(properties: Value) -> Value {
    json!({
        "_source": { "enabled": true },
        "properties": properties,
    })
}

/// A get-mapping reply is keyed by physical index; it counts as present when
/// any entry carries a non-empty `mappings` object.
fn mapping_present(mapping: &Value) -> bool {
    let Some(indices) = mapping.as_object() else {
        return false;
    };

    indices.values().any(|entry| {
        entry
            .get("mappings")
            .and_then(Value::as_object)
            .is_some_and(|mappings| !mappings.is_empty())
    })
}
