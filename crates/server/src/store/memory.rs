use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Document, DocumentStore, Filter, ID_FIELD};
use crate::error::StoreError;

/// An in-process [`DocumentStore`]. Contents live as long as the store.
///
/// Every inserted document gets a numeric `_id` unless it brings its own;
/// a duplicate `_id` within a collection is refused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        match document.get(ID_FIELD) {
            Some(id) if documents.iter().any(|existing| existing.get(ID_FIELD) == Some(id)) => {
                return Err(StoreError::duplicate_key(collection, id));
            }
            Some(_) => {}
            None => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                document.insert(ID_FIELD.to_string(), Value::from(id));
            }
        }

        debug!(collection, "insert document");
        documents.push(document.clone());
        Ok(document)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let found = collections
            .get(collection)
            .map(|documents| documents.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default();
        Ok(found)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: Document,
    ) -> Result<Option<Document>, StoreError> {
        if update.contains_key(ID_FIELD) {
            return Err(StoreError::ImmutableField { field: ID_FIELD });
        }

        let mut collections = self.collections.write().await;
        let Some(document) = collections.get_mut(collection).and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)))
        else {
            return Ok(None);
        };

        document.extend(update);
        Ok(Some(document.clone()))
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|doc| !filter.matches(doc));
        let deleted = (before - documents.len()) as u64;
        debug!(collection, deleted, "delete documents");
        Ok(deleted)
    }
}
