//! Flex service implementation.
//!
//! This module provides the main service application code uses to keep
//! entities in sync with the search index. The operations themselves live in
//! the `sync`, `query`, `mapping` and `collection` modules as `impl` blocks on
//! [`FlexService`].

use std::sync::Arc;

use flex_shared::{DocumentAddress, IndexTarget};

use crate::config::FlexConfig;
use crate::indexable::Indexable;
use crate::interfaces::SearchClient;

/// The main service for syncing entities with the search index.
///
/// Holds the configuration and a shared search client. Cloning is cheap and
/// clones share the client.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use flex_repository::{FlexConfig, FlexService};
/// use flex_repository::opensearch::{IndexConfig, OpenSearchProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FlexConfig::from_env()?;
/// let provider = OpenSearchProvider::new(&config.url, IndexConfig::default()).await?;
/// let service = FlexService::new(Arc::new(provider), config);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FlexService {
    client: Arc<dyn SearchClient>,
    config: FlexConfig,
}

impl FlexService {
    /// Create a new FlexService.
    ///
    /// # Arguments
    ///
    /// * `client` - A shared implementation of `SearchClient` (e.g., `OpenSearchProvider`)
    /// * `config` - Collection name, auto-index flag and query defaults
    pub fn new(client: Arc<dyn SearchClient>, config: FlexConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FlexConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &dyn SearchClient {
        self.client.as_ref()
    }

    /// Collection name for the entity: its override, else the configured index.
    pub fn index_name<T: Indexable>(&self, entity: &T) -> String {
        entity
            .index_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.index.clone())
    }

    /// Category name for the entity: its override, else its table.
    pub fn type_name<T: Indexable>(&self, entity: &T) -> String {
        entity
            .type_name()
            .unwrap_or_else(|| entity.table())
            .to_string()
    }

    /// The (collection, category) pair the entity is indexed under.
    pub fn target<T: Indexable>(&self, entity: &T) -> IndexTarget {
        IndexTarget::new(self.index_name(entity), self.type_name(entity))
    }

    /// The entity's document address; the key is absent for unsaved entities.
    pub fn address<T: Indexable>(&self, entity: &T) -> DocumentAddress {
        self.target(entity).document(entity.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynamicEntity;
    use crate::testing::RecordingClient;
    use flex_shared::DocumentKey;

    fn service() -> FlexService {
        FlexService::new(Arc::new(RecordingClient::new()), FlexConfig::new("blog"))
    }

    #[test]
    fn test_names_fall_back_to_config_and_table() {
        let service = service();
        let entity = DynamicEntity::new("articles");

        assert_eq!(service.index_name(&entity), "blog");
        assert_eq!(service.type_name(&entity), "articles");
    }

    #[test]
    fn test_names_use_entity_overrides() {
        let service = service();
        let entity = DynamicEntity::new("articles")
            .with_index_name("archive")
            .with_type_name("posts");

        assert_eq!(service.index_name(&entity), "archive");
        assert_eq!(service.type_name(&entity), "posts");
    }

    #[test]
    fn test_address_carries_key() {
        let service = service();
        let mut entity = DynamicEntity::new("articles");
        assert_eq!(service.address(&entity).key, None);

        entity.set_key(DocumentKey::from(42));
        assert_eq!(
            service.address(&entity),
            DocumentAddress::new("blog", "articles", Some(DocumentKey::Int(42)))
        );
    }
}
