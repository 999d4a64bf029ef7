//! Typed access to a single collection.
//!
//! A [`TypedCollection`] binds a backend reference to a collection name and a
//! document type, and converts between `D` and BSON on the way in and out.

use bson::Bson;
use futures::TryStreamExt;
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::StoreResult,
    page::FindWindow,
    query::Expr,
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a document and returns the identifier the store assigned.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if serialization or insertion fails.
    pub async fn insert_one(&self, document: &D) -> StoreResult<Bson> {
        self.backend
            .insert_one(document.to_document()?, self.name())
            .await
    }

    /// Finds the first document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if the lookup or decoding fails.
    pub async fn find_one(&self, filter: Expr) -> StoreResult<Option<D>> {
        self.backend
            .find_one(filter, self.name())
            .await?
            .map(D::from_document)
            .transpose()
    }

    /// Reads the documents matching `filter` inside `window`.
    ///
    /// The backend's stream is drained into a vector sized for the window; a
    /// decode failure on any row fails the whole read.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if the query, the stream, or decoding fails.
    pub async fn find_many(&self, filter: Expr, window: FindWindow) -> StoreResult<Vec<D>> {
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let capacity = usize::try_from(window.limit).unwrap_or(usize::MAX).min(1024);

        self.backend
            .find_many(filter, window, self.name())
            .await?
            .and_then(|document| async move { D::from_document(document) })
            .try_fold(Vec::with_capacity(capacity), |mut documents, document| async move {
                documents.push(document);
                Ok(documents)
            })
            .await
    }

    /// Replaces the document matching `filter` and returns the matched count.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if serialization or the replace fails.
    pub async fn replace_one(&self, filter: Expr, document: &D) -> StoreResult<u64> {
        self.backend
            .replace_one(filter, document.to_document()?, self.name())
            .await
    }

    /// Deletes the document matching `filter` and returns the deleted count.
    pub async fn delete_one(&self, filter: Expr) -> StoreResult<u64> {
        self.backend
            .delete_one(filter, self.name())
            .await
    }

    /// Counts the documents matching `filter`.
    pub async fn count(&self, filter: Expr) -> StoreResult<u64> {
        self.backend
            .count_documents(filter, self.name())
            .await
    }
}
