//! # Flex Repository
//!
//! Keeps persisted entities in sync with a search index. Entities implement
//! [`Indexable`]; a [`FlexService`] built from a [`FlexConfig`] and a shared
//! [`SearchClient`] indexes, updates and removes their documents, runs query
//! shortcuts and manages category mappings. [`OpenSearchProvider`] is the
//! concrete client.

pub mod collection;
pub mod config;
pub mod dynamic;
pub mod errors;
pub mod indexable;
pub mod interfaces;
pub mod mapping;
pub mod opensearch;
pub mod query;
pub mod service;
pub mod sync;

#[cfg(test)]
mod testing;

pub use config::FlexConfig;
pub use dynamic::DynamicEntity;
pub use errors::FlexError;
pub use indexable::Indexable;
pub use interfaces::{EntityStore, SearchClient};
pub use opensearch::{IndexConfig, OpenSearchProvider};
pub use query::EntityScope;
pub use service::FlexService;
