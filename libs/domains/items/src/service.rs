//! Item Service - orchestrates the five item operations

use std::sync::Arc;
use tracing::instrument;

use crate::error::{ItemError, ItemResult};
use crate::models::{DeleteStatus, Item, ItemDocument, ItemInput, ListParams, parse_item_id};
use crate::repository::ItemRepository;

/// Item service
///
/// Parses identifiers before touching the repository, so a malformed id
/// never reaches the store.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

impl<R: ItemRepository> ItemService<R> {
    /// Create a new ItemService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Get an item by ID
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: &str) -> ItemResult<Item> {
        let oid = parse_item_id(id)?;

        self.repository
            .find_by_id(oid)
            .await?
            .ok_or_else(|| ItemError::NotFound(id.to_string()))?
            .into_item()
    }

    /// List items in insertion order.
    ///
    /// `limit == 0` means no cap: the query is sized from the current count.
    /// A `skip` beyond `i64::MAX` is past the end of any collection and
    /// yields an empty page without a store round trip.
    #[instrument(skip(self))]
    pub async fn list_items(&self, params: ListParams) -> ItemResult<Vec<Item>> {
        if i64::try_from(params.skip).is_err() {
            return Ok(Vec::new());
        }

        let limit = if params.limit == 0 {
            let remaining = self.repository.count().await?.saturating_sub(params.skip);
            if remaining == 0 {
                return Ok(Vec::new());
            }
            remaining
        } else {
            params.limit
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.repository
            .find_all(params.skip, Some(limit))
            .await?
            .into_iter()
            .map(ItemDocument::into_item)
            .collect()
    }

    /// Create a new item
    #[instrument(skip(self, input), fields(item_name = %input.name))]
    pub async fn create_item(&self, input: ItemInput) -> ItemResult<Item> {
        self.repository.insert(input).await?.into_item()
    }

    /// Replace every field of an item
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: &str, input: ItemInput) -> ItemResult<Item> {
        let oid = parse_item_id(id)?;

        let outcome = self.repository.update(oid, input).await?;
        if outcome.matched == 0 {
            return Err(ItemError::NotFound(id.to_string()));
        }
        if outcome.modified == 0 {
            return Err(ItemError::NotModified(id.to_string()));
        }

        // Deleted between the update and this read
        self.repository
            .find_by_id(oid)
            .await?
            .ok_or_else(|| ItemError::NotFound(id.to_string()))?
            .into_item()
    }

    /// Delete an item
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> ItemResult<DeleteStatus> {
        let oid = parse_item_id(id)?;

        match self.repository.delete(oid).await? {
            0 => Err(ItemError::NotFound(id.to_string())),
            deleted => Ok(DeleteStatus::new(deleted)),
        }
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
