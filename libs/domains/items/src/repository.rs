use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ItemResult;
use crate::models::{ItemDocument, ItemInput};

/// Matched/modified counts reported by a replace-all-fields update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Repository trait for Item persistence
///
/// Each method is one store round trip. Implementations must assign the
/// identifier on insert and list in a stable order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Get an item by ID
    async fn find_by_id(&self, id: ObjectId) -> ItemResult<Option<ItemDocument>>;

    /// List items in insertion order, skipping `skip` and returning at most `limit`
    async fn find_all(&self, skip: u64, limit: Option<i64>) -> ItemResult<Vec<ItemDocument>>;

    /// Count all stored items
    async fn count(&self) -> ItemResult<u64>;

    /// Insert a new item and return it with its assigned ID
    async fn insert(&self, input: ItemInput) -> ItemResult<ItemDocument>;

    /// Overwrite every field of an existing item
    async fn update(&self, id: ObjectId, input: ItemInput) -> ItemResult<UpdateOutcome>;

    /// Delete an item by ID, returning the number of deleted records
    async fn delete(&self, id: ObjectId) -> ItemResult<u64>;
}
