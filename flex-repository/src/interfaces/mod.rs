//! Interface definitions for the search client and the persistence layer.
//!
//! `SearchClient` allows swappable search backends; `EntityStore` is the seam
//! to the application's own persistence layer used by the lifecycle hooks.

mod entity_store;
mod search_client;

pub use entity_store::EntityStore;
pub use search_client::SearchClient;
