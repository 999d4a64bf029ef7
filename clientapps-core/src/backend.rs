//! Storage backend abstraction for the document store.
//!
//! The record service needs six primitives from a document store and nothing
//! else. [`StoreBackend`] names exactly those, so a backend can be a real
//! database driver, an in-memory map, or a test double.
//!
//! # Example
//!
//! ```ignore
//! use clientapps_core::{backend::StoreBackend, query::Filter};
//! use bson::doc;
//!
//! let id = backend.insert_one(doc! { "clientId": "112122060" }, "clientapps").await?;
//! let found = backend.find_one(Filter::eq("_id", id), "clientapps").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Document};
use futures::stream::BoxStream;
use std::fmt::Debug;

use crate::{error::StoreResult, page::FindWindow, query::Expr};

/// A lazily produced sequence of documents returned by [`StoreBackend::find_many`].
pub type DocumentStream = BoxStream<'static, StoreResult<Document>>;

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations are shared by every in-flight call and must support
/// concurrent use. Each operation is expected to be atomic for the single
/// document it touches; nothing stronger is assumed.
///
/// # Error Handling
///
/// Operations return [`StoreResult<T>`](crate::error::StoreResult). A missing
/// document is not an error: it is reported through `None` or a zero count.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a document and returns the identifier the store assigned to it.
    ///
    /// If `document` has no `_id`, the store generates one.
    async fn insert_one(&self, document: Document, collection: &str) -> StoreResult<Bson>;

    /// Returns the first document matching `filter`, in store order.
    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>>;

    /// Streams the documents matching `filter` inside `window`, in store order.
    ///
    /// A window with a zero limit yields no documents.
    async fn find_many(
        &self,
        filter: Expr,
        window: FindWindow,
        collection: &str,
    ) -> StoreResult<DocumentStream>;

    /// Replaces the first document matching `filter` with `document` and
    /// returns how many documents matched (zero or one).
    async fn replace_one(
        &self,
        filter: Expr,
        document: Document,
        collection: &str,
    ) -> StoreResult<u64>;

    /// Deletes the first document matching `filter` and returns how many
    /// documents were removed (zero or one).
    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64>;

    /// Counts the documents matching `filter`.
    async fn count_documents(&self, filter: Expr, collection: &str) -> StoreResult<u64>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external
    /// connections should override this.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
