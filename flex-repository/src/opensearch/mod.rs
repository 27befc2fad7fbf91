//! OpenSearch implementation of the search client.
//!
//! This module provides a concrete implementation of `SearchClient`
//! using OpenSearch as the backend.

mod index_config;
mod provider;

pub use index_config::{index_creation_body, physical_index_name, IndexConfig};
pub use provider::OpenSearchProvider;
