//! Process-local document store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{DocumentStore, DocumentStoreError, WriteOutcome};
use crate::domain::{DocId, Document, Filter, Patch, ReadOptions, Record};

use super::collection::Collection;

/// Document store holding one collection in memory.
///
/// Contents are lost when the process exits.
pub struct InMemoryDocumentStore<D> {
    collection: RwLock<Collection<D>>,
    clock: Arc<dyn Clock>,
}

impl<D: Document> InMemoryDocumentStore<D> {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: RwLock::new(Collection::default()),
            clock,
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.collection.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for InMemoryDocumentStore<D> {
    async fn create_one(&self, fields: D) -> Result<DocId, DocumentStoreError> {
        let now = self.clock.utc();
        let id = self.collection.write().await.insert(fields, now);
        debug!(collection = D::COLLECTION, %id, "record created");
        Ok(id)
    }

    async fn read_one(&self, filter: &Filter) -> Result<Option<Record<D>>, DocumentStoreError> {
        self.collection.read().await.read_one(filter)
    }

    async fn read_many(
        &self,
        filter: &Filter,
        options: &ReadOptions,
    ) -> Result<Vec<Record<D>>, DocumentStoreError> {
        self.collection.read().await.read_many(filter, options)
    }

    async fn update_one(
        &self,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<WriteOutcome, DocumentStoreError> {
        let now = self.clock.utc();
        let outcome = self.collection.write().await.update_one(filter, patch, now)?;
        debug!(collection = D::COLLECTION, matched = outcome.matched, "record updated");
        Ok(outcome)
    }

    async fn delete_one(&self, filter: &Filter) -> Result<WriteOutcome, DocumentStoreError> {
        let outcome = self.collection.write().await.delete_one(filter)?;
        debug!(collection = D::COLLECTION, matched = outcome.matched, "record deleted");
        Ok(outcome)
    }
}
