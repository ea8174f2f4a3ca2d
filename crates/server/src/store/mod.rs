//! The document store boundary.
//!
//! Services talk to storage only through [`DocumentStore`], a small
//! collection oriented interface. The handle is built once at startup and
//! passed into the [`App`](crate::App); nothing reaches for a global.

mod filter;
mod memory;

pub use filter::Filter;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A stored document: field name to json value.
pub type Document = Map<String, Value>;

/// Name of the field holding a document's store assigned id.
pub const ID_FIELD: &str = "_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `document` and returns it as stored, id included.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Document, StoreError>;

    /// Returns every document matching `filter`, in insertion order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// Sets the fields of `update` on the first document matching `filter`
    /// and returns that document after the update, or `None` if nothing matched.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Removes every document matching `filter` and returns how many were removed.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}
