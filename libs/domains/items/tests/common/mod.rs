//! In-memory ItemRepository for router tests that should not need Docker

use async_trait::async_trait;
use domain_items::{ItemDocument, ItemInput, ItemRepository, ItemResult, UpdateOutcome};
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Clones share the same storage, so a test can keep a handle after
/// moving one into the service.
#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    items: Arc<Mutex<Vec<ItemDocument>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryItemRepository {
    /// Number of repository calls made so far
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_by_id(&self, id: ObjectId) -> ItemResult<Option<ItemDocument>> {
        self.touch();
        let items = self.items.lock().unwrap();
        Ok(items.iter().find(|doc| doc.id == Some(id)).cloned())
    }

    async fn find_all(&self, skip: u64, limit: Option<i64>) -> ItemResult<Vec<ItemDocument>> {
        self.touch();
        let items = self.items.lock().unwrap();
        let take = limit.map_or(usize::MAX, |l| l as usize);
        Ok(items.iter().skip(skip as usize).take(take).cloned().collect())
    }

    async fn count(&self) -> ItemResult<u64> {
        self.touch();
        Ok(self.items.lock().unwrap().len() as u64)
    }

    async fn insert(&self, input: ItemInput) -> ItemResult<ItemDocument> {
        self.touch();
        let document = ItemDocument {
            id: Some(ObjectId::new()),
            ..ItemDocument::from(input)
        };
        self.items.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn update(&self, id: ObjectId, input: ItemInput) -> ItemResult<UpdateOutcome> {
        self.touch();
        let mut items = self.items.lock().unwrap();
        let Some(existing) = items.iter_mut().find(|doc| doc.id == Some(id)) else {
            return Ok(UpdateOutcome::default());
        };

        let replacement = ItemDocument {
            id: Some(id),
            ..ItemDocument::from(input)
        };
        let modified = u64::from(*existing != replacement);
        *existing = replacement;

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete(&self, id: ObjectId) -> ItemResult<u64> {
        self.touch();
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|doc| doc.id != Some(id));
        Ok((before - items.len()) as u64)
    }
}
