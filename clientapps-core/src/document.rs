//! Core traits for persisted documents and their BSON encoding.
//!
//! Every type stored through a [`TypedCollection`](crate::collection::TypedCollection)
//! implements [`Document`]; [`DocumentExt`] is blanket-implemented on top of it and
//! converts values to and from the `bson::Document` form the backends speak.

use bson::{Bson, Document as BsonDocument, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Trait that all documents stored in a document store must implement.
///
/// Documents do not carry a client-side key: the store assigns `_id` on insert.
///
/// # Example
///
/// ```ignore
/// use clientapps_core::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Tenant {
///     pub name: String,
/// }
///
/// impl Document for Tenant {
///     fn collection_name() -> &'static str {
///         "tenants"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversions for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value does not serialize to a document.
    fn to_document(&self) -> StoreResult<BsonDocument>;

    /// Creates a value from a stored BSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_document(document: BsonDocument) -> StoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_document(&self) -> StoreResult<BsonDocument> {
        match serialize_to_bson(self)? {
            Bson::Document(document) => Ok(document),
            other => Err(StoreError::InvalidDocument(format!(
                "{} serialized to {:?}, expected a document",
                D::collection_name(),
                other.element_type(),
            ))),
        }
    }

    fn from_document(document: BsonDocument) -> StoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(document))?)
    }
}
