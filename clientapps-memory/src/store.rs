//! In-memory storage implementation for document stores.
//!
//! Each collection is a vector of BSON documents kept in insertion order,
//! which is the "store order" every query observes.

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use futures::{StreamExt, stream};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::trace;

use clientapps_core::{
    backend::{DocumentStream, StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    page::FindWindow,
    query::Expr,
};

use crate::evaluator::DocumentEvaluator;

type StoreMap = HashMap<String, Vec<Document>>;

const ID_FIELD: &str = "_id";

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state.
/// Multiple clones of the same instance share the same underlying data.
///
/// Queries scan the whole collection; there are no indexes, and the
/// business identifier is not constrained to be unique.
///
/// # Example
///
/// ```ignore
/// use clientapps_memory::InMemoryStore;
/// use clientapps_core::{backend::StoreBackend, query::Filter};
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_one(doc! { "clientId": "112122060" }, "clientapps").await?;
/// assert!(store.find_one(Filter::eq("_id", id), "clientapps").await?.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_one(&self, mut document: Document, collection: &str) -> StoreResult<Bson> {
        let id = match document.get(ID_FIELD) {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert(ID_FIELD, id.clone());
                id
            }
        };

        let mut store = self.store.write().await;
        let documents = store
            .entry(collection.to_string())
            .or_default();

        if documents.iter().any(|existing| existing.get(ID_FIELD) == Some(&id)) {
            return Err(StoreError::DuplicateKey(id.to_string(), collection.to_string()));
        }

        documents.push(document);
        trace!(collection, %id, "inserted document");

        Ok(id)
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>> {
        let store = self.store.read().await;

        Ok(
            store
                .get(collection)
                .and_then(|documents| {
                    documents
                        .iter()
                        .find(|document| DocumentEvaluator::matches(document, &filter))
                })
                .cloned()
        )
    }

    async fn find_many(&self, filter: Expr, window: FindWindow, collection: &str) -> StoreResult<DocumentStream> {
        let store = self.store.read().await;

        let documents = match store.get(collection) {
            Some(documents) => documents
                .iter()
                .filter(|document| DocumentEvaluator::matches(document, &filter))
                .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect::<Vec<_>>(),
            None => Vec::new(),
        };

        Ok(stream::iter(documents.into_iter().map(Ok)).boxed())
    }

    async fn replace_one(&self, filter: Expr, mut document: Document, collection: &str) -> StoreResult<u64> {
        let mut store = self.store.write().await;

        let Some(existing) = store
            .get_mut(collection)
            .and_then(|documents| {
                documents
                    .iter_mut()
                    .find(|document| DocumentEvaluator::matches(document, &filter))
            })
        else {
            return Ok(0);
        };

        // The replacement keeps the stored _id, as a document database would.
        let id = existing.get(ID_FIELD).cloned();
        if let Some(new_id) = document.get(ID_FIELD) {
            if Some(new_id) != id.as_ref() {
                return Err(StoreError::InvalidDocument(format!(
                    "replacement would change _id of a document in collection {collection}"
                )));
            }
        }
        if let Some(id) = id {
            document.insert(ID_FIELD, id);
        }

        *existing = document;

        Ok(1)
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        let mut store = self.store.write().await;

        let Some(documents) = store.get_mut(collection) else {
            return Ok(0);
        };

        match documents
            .iter()
            .position(|document| DocumentEvaluator::matches(document, &filter))
        {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_documents(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        let store = self.store.read().await;

        Ok(
            store
                .get(collection)
                .map(|documents| {
                    documents
                        .iter()
                        .filter(|document| DocumentEvaluator::matches(document, &filter))
                        .count() as u64
                })
                .unwrap_or(0)
        )
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
