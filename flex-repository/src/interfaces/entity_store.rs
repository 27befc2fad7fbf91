//! Persistence seam used by the save/delete lifecycle hooks.

use async_trait::async_trait;

use crate::errors::FlexError;
use crate::indexable::Indexable;

/// The application's persistence layer for an entity type.
///
/// Flex never writes rows itself; `FlexService::save` and
/// `FlexService::delete` wrap these calls with document sync.
#[async_trait]
pub trait EntityStore<T: Indexable>: Send + Sync {
    /// Persist the entity.
    ///
    /// Inserting a new entity must assign its primary key. After a successful
    /// save the entity reports no dirty attributes.
    async fn save(&self, entity: &mut T) -> Result<(), FlexError>;

    /// Delete the entity's row.
    async fn delete(&self, entity: &T) -> Result<(), FlexError>;
}
