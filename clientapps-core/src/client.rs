//! The client application record: wire shape and persisted shape.
//!
//! [`ClientApp`] is what callers receive. [`ClientAppDocument`] is what the
//! store holds. Both are produced by a single serde mapping, so the shape
//! written by Create and Update is the shape Get and List decode.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    document::Document,
    error::{StoreError, StoreResult},
    ids::{BusinessId, StorageId},
};

/// Which student data fields a client application may access.
///
/// Every flag defaults to `false` when absent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Permissions {
    pub roll_no: bool,
    pub name: bool,
    pub gender: bool,
    pub department_id: bool,
    pub nationality: bool,
    pub mobile_no: bool,
    pub address: bool,
    pub picture_url: bool,
    pub dob: bool,
}

impl Permissions {
    /// Number of flags that are set.
    pub fn granted(&self) -> usize {
        [
            self.roll_no,
            self.name,
            self.gender,
            self.department_id,
            self.nationality,
            self.mobile_no,
            self.address,
            self.picture_url,
            self.dob,
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count()
    }
}

/// A student associated with a client application.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Student {
    pub roll_no: i32,
    /// External identifier of the student.
    pub oid: String,
}

impl Student {
    pub fn new(roll_no: i32, oid: impl Into<String>) -> Self {
        Self { roll_no, oid: oid.into() }
    }
}

/// A client application record as returned to callers.
///
/// Both identifiers are always populated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientApp {
    pub id: StorageId,
    pub client_id: BusinessId,
    pub client_name: String,
    pub client_logo: String,
    pub client_secret: String,
    pub domains: Vec<String>,
    pub permissions: Permissions,
    pub student_list: Vec<Student>,
}

/// The persisted form of a client application.
///
/// `id` is `None` until the store has assigned one.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientAppDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub client_id: BusinessId,
    pub client_name: String,
    pub client_logo: String,
    pub client_secret: String,
    pub domains: Vec<String>,
    pub permissions: Permissions,
    pub student_list: Vec<Student>,
}

impl Document for ClientAppDocument {
    fn collection_name() -> &'static str {
        "clientapps"
    }
}

impl ClientAppDocument {
    /// Field holding the business identifier.
    pub const CLIENT_ID_FIELD: &'static str = "clientId";
    /// Field holding the storage identifier.
    pub const ID_FIELD: &'static str = "_id";

    /// Builds the response record for a document whose storage id is known.
    pub fn into_client_app_with_id(self, id: StorageId) -> ClientApp {
        ClientApp {
            id,
            client_id: self.client_id,
            client_name: self.client_name,
            client_logo: self.client_logo,
            client_secret: self.client_secret,
            domains: self.domains,
            permissions: self.permissions,
            student_list: self.student_list,
        }
    }
}

impl TryFrom<ClientAppDocument> for ClientApp {
    type Error = StoreError;

    /// Converts a document read from the store, which must carry its `_id`.
    fn try_from(document: ClientAppDocument) -> StoreResult<Self> {
        let id = document.id.ok_or_else(|| {
            StoreError::InvalidDocument(format!(
                "client {} was read without an _id",
                document.client_id,
            ))
        })?;

        Ok(document.into_client_app_with_id(StorageId::from(id)))
    }
}
