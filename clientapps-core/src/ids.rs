//! The two identifiers of a client application record.
//!
//! A record is addressed by two unrelated keys:
//!
//! - [`BusinessId`] is chosen by the caller at creation and used by Get.
//! - [`StorageId`] is generated by the document store at insert and used by Update and Delete.
//!
//! Keeping them as distinct types means a business identifier can never be
//! handed to an operation that expects a storage key, or the other way round.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ClientServiceError;

/// Caller-supplied identifier of a client application.
///
/// Opaque: no format is imposed and uniqueness is not enforced by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(String);

impl BusinessId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BusinessId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BusinessId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for BusinessId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Store-generated identifier of a client application.
///
/// On the wire this is the 24-digit hex form of a BSON ObjectId. Any other
/// string is rejected with [`ClientServiceError::InvalidArgument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageId(ObjectId);

impl StorageId {
    /// Parses the wire form of a storage identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientServiceError::InvalidArgument`] if `s` is not a 24-digit hex string.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, ClientServiceError> {
        let s = s.as_ref();

        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|e| ClientServiceError::InvalidArgument(format!("Invalid ID format {s:?}: {e}")))
    }

    /// Returns the store-native key.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Returns the 24-digit hex wire form.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<ObjectId> for StorageId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<StorageId> for ObjectId {
    fn from(value: StorageId) -> Self {
        value.0
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for StorageId {
    type Err = ClientServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for StorageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for StorageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StorageId::parse(&s).map_err(serde::de::Error::custom)
    }
}
