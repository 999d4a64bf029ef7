//! The remote-procedure contract of the client service.
//!
//! A transport adapter decodes a request, builds a [`CallContext`] from the
//! caller's deadline, and invokes the matching [`ClientApi`] method. Identifier
//! fields that name a storage key are plain strings here; the service parses
//! them and rejects malformed values.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use crate::{
    client::{ClientApp, Permissions, Student},
    error::ServiceResult,
    ids::BusinessId,
};

/// Per-call metadata propagated from the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext {
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context without a deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline: Some(deadline) }
    }

    /// A context that expires `timeout` from now.
    ///
    /// A timeout too large for the clock to represent yields no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub client_id: BusinessId,
    pub client_name: String,
    pub client_logo: String,
    pub client_secret: String,
    pub domains: Vec<String>,
    pub permissions: Permissions,
    pub student_list: Vec<Student>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GetClientRequest {
    pub client_id: BusinessId,
}

/// Replaces every field of an existing record.
///
/// This is a full replace, not a patch: fields left at their defaults
/// overwrite what was stored. `client_id` must be the record's current
/// business identifier; it cannot be changed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateClientRequest {
    /// Storage identifier of the record to replace.
    pub id: String,
    pub client_id: BusinessId,
    pub client_name: String,
    pub client_logo: String,
    pub client_secret: String,
    pub domains: Vec<String>,
    pub permissions: Permissions,
    pub student_list: Vec<Student>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteClientRequest {
    /// Storage identifier of the record to delete.
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteClientResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListClientsRequest {
    pub page: i32,
    pub page_size: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListClientsResponse {
    pub clients: Vec<ClientApp>,
    /// Size of the whole collection, not of this page.
    pub total_count: u64,
}

/// The five client service operations.
#[async_trait]
pub trait ClientApi: Send + Sync {
    async fn create_client(&self, ctx: &CallContext, request: CreateClientRequest) -> ServiceResult<ClientApp>;

    async fn get_client(&self, ctx: &CallContext, request: GetClientRequest) -> ServiceResult<ClientApp>;

    async fn update_client(&self, ctx: &CallContext, request: UpdateClientRequest) -> ServiceResult<ClientApp>;

    async fn delete_client(&self, ctx: &CallContext, request: DeleteClientRequest) -> ServiceResult<DeleteClientResponse>;

    async fn list_clients(&self, ctx: &CallContext, request: ListClientsRequest) -> ServiceResult<ListClientsResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_use_camel_case_names() {
        let request: UpdateClientRequest = serde_json::from_value(serde_json::json!({
            "id": "65f1c0ffee00000000000001",
            "clientId": "112122060",
            "clientName": "Updated Client Name",
            "studentList": [{ "rollNo": 201, "oid": "updated-student-id-1" }],
        }))
        .unwrap();

        assert_eq!(request.client_id.as_str(), "112122060");
        assert_eq!(request.student_list, vec![Student::new(201, "updated-student-id-1")]);
        assert!(request.domains.is_empty());
        assert_eq!(request.permissions, Permissions::default());
    }

    #[test]
    fn background_context_has_no_deadline() {
        assert_eq!(CallContext::background().deadline(), None);
        assert!(CallContext::with_timeout(Duration::from_secs(1)).deadline().is_some());
    }

    #[test]
    fn unrepresentable_timeout_means_no_deadline() {
        assert_eq!(CallContext::with_timeout(Duration::MAX).deadline(), None);
    }
}
