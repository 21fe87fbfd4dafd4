//! MongoDB implementation of ItemRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc, oid::ObjectId},
    options::FindOptions,
};
use tracing::instrument;

use crate::error::{ItemError, ItemResult};
use crate::models::{ItemDocument, ItemInput};
use crate::repository::{ItemRepository, UpdateOutcome};

/// Collection holding item documents
pub const COLLECTION_NAME: &str = "item";

/// MongoDB implementation of the ItemRepository
#[derive(Clone)]
pub struct MongoItemRepository {
    collection: Collection<ItemDocument>,
}

impl MongoItemRepository {
    /// Create a new MongoItemRepository over the `item` collection
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoItemRepository::new(client.database("item_db"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    /// Create a new MongoItemRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<ItemDocument>(collection_name);
        Self { collection }
    }

    /// Sorted by `_id` so skip/limit windows line up with insertion order
    fn find_options(skip: u64, limit: Option<i64>) -> FindOptions {
        let mut options = FindOptions::default();
        options.sort = Some(doc! { "_id": 1 });
        options.skip = (skip > 0).then_some(skip);
        options.limit = limit;
        options
    }

    fn set_all_fields(input: ItemInput) -> Document {
        doc! {
            "$set": {
                "name": input.name,
                "description": input.description,
                "price": input.price,
                "tax": input.tax,
            }
        }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> ItemResult<Option<ItemDocument>> {
        let item = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn find_all(&self, skip: u64, limit: Option<i64>) -> ItemResult<Vec<ItemDocument>> {
        let cursor = self
            .collection
            .find(doc! {})
            .with_options(Self::find_options(skip, limit))
            .await?;
        let items: Vec<ItemDocument> = cursor.try_collect().await?;

        Ok(items)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> ItemResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    #[instrument(skip(self, input), fields(item_name = %input.name))]
    async fn insert(&self, input: ItemInput) -> ItemResult<ItemDocument> {
        let document = ItemDocument::from(input);
        let result = self.collection.insert_one(&document).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            ItemError::MissingIdentifier(format!(
                "insert returned non-ObjectId _id {}",
                result.inserted_id
            ))
        })?;

        tracing::info!(item_id = %id, "Item created successfully");
        Ok(ItemDocument {
            id: Some(id),
            ..document
        })
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: ItemInput) -> ItemResult<UpdateOutcome> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, Self::set_all_fields(input))
            .await?;

        tracing::info!(
            item_id = %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "Item update applied"
        );
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ItemResult<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        tracing::info!(item_id = %id, deleted = result.deleted_count, "Item delete applied");
        Ok(result.deleted_count)
    }
}
