//! In-memory document store, for tests and database-less development

use query::{Document, DocumentQuery, eval};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::collection::Collection;
use crate::domain::document::{id_of, key_value};
use crate::domain::repository::DocumentStore;
use crate::error::{TourError, TourResult};

/// Documents per collection, kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    /// Existing document other than `id` holding the unique keys of `doc`
    fn duplicate_of(
        collection: Collection,
        documents: &[Document],
        id: Uuid,
        doc: &Document,
    ) -> Option<String> {
        let keys = collection.unique_keys();
        if keys.is_empty() {
            return None;
        }
        let value = key_value(doc, keys)?;
        documents
            .iter()
            .filter(|other| id_of(other) != Some(id))
            .any(|other| key_value(other, keys).as_ref() == Some(&value))
            .then_some(value)
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, id: Uuid, doc: &Document) -> TourResult<()> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        if let Some(value) = Self::duplicate_of(collection, documents, id, doc) {
            return Err(TourError::Duplicate(value));
        }
        documents.push(doc.clone());
        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> TourResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|doc| id_of(doc) == Some(id)))
            .cloned())
    }

    async fn find(
        &self,
        collection: Collection,
        query: &DocumentQuery,
    ) -> TourResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let documents = collections.get(&collection).cloned().unwrap_or_default();
        Ok(eval::execute(query, documents))
    }

    async fn replace(&self, collection: Collection, id: Uuid, doc: &Document) -> TourResult<bool> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        if let Some(value) = Self::duplicate_of(collection, documents, id, doc) {
            return Err(TourError::Duplicate(value));
        }
        match documents.iter_mut().find(|stored| id_of(stored) == Some(id)) {
            Some(stored) => {
                *stored = doc.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> TourResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = documents.len();
        documents.retain(|doc| id_of(doc) != Some(id));
        Ok(documents.len() != before)
    }
}
