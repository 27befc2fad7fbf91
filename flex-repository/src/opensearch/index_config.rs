//! OpenSearch index naming and settings.
//!
//! OpenSearch has no document types, so each (collection, category) pair is
//! stored in its own physical index named `<collection>_<category>`.

use flex_shared::IndexTarget;
use serde_json::{json, Value};

/// Settings applied when the provider creates a physical index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    /// Refresh the index after each document write, making it visible to
    /// search immediately. Off by default.
    pub refresh: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
            refresh: false,
        }
    }
}

impl IndexConfig {
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

/// Name of the physical index holding the target's documents.
///
/// Index names must be lowercase.
///
/// # Returns
///
/// The physical index name (e.g., "blog_articles")
pub fn physical_index_name(target: &IndexTarget) -> String {
    format!("{}_{}", target.index, target.type_name).to_lowercase()
}

/// Body for creating a physical index with `mapping` as its mappings.
pub fn index_creation_body(config: &IndexConfig, mapping: &Value) -> Value {
    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
            "number_of_replicas": config.number_of_replicas
        },
        "mappings": mapping
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_index_name() {
        assert_eq!(
            physical_index_name(&IndexTarget::new("blog", "articles")),
            "blog_articles"
        );
        assert_eq!(
            physical_index_name(&IndexTarget::new("Blog", "BlogPosts")),
            "blog_blogposts"
        );
    }

    #[test]
    fn test_index_creation_body() {
        let mapping = json!({
            "_source": {"enabled": true},
            "properties": {"title": {"type": "text"}}
        });

        let body = index_creation_body(&IndexConfig::default(), &mapping);

        assert_eq!(body["settings"]["number_of_shards"], 1);
        assert_eq!(body["settings"]["number_of_replicas"], 1);
        assert_eq!(body["mappings"], mapping);
    }

    #[test]
    fn test_default_does_not_refresh() {
        assert!(!IndexConfig::default().refresh);
        assert!(IndexConfig::default().with_refresh(true).refresh);
    }
}
