//! The client application record service.
//!
//! [`ClientAppService`] implements [`ClientApi`] on top of a shared
//! [`DocumentStore`]. Each operation issues the minimal store calls, maps
//! every store failure to [`ClientServiceError::Internal`] once, and races
//! each store call against the caller's deadline.
//!
//! Identifier rules:
//!
//! - Get looks records up by [`BusinessId`](crate::ids::BusinessId).
//! - Update and Delete address records by [`StorageId`], parsed before any
//!   store access.
//! - Update is a full replace and cannot change the business identifier: the
//!   replace filter requires both identifiers to match.

use async_trait::async_trait;
use bson::Bson;
use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, instrument, warn};

use crate::{
    api::{
        CallContext, ClientApi, CreateClientRequest, DeleteClientRequest, DeleteClientResponse,
        GetClientRequest, ListClientsRequest, ListClientsResponse, UpdateClientRequest,
    },
    backend::StoreBackend,
    client::{ClientApp, ClientAppDocument},
    collection::TypedCollection,
    error::{ClientServiceError, ServiceResult, StoreResult},
    ids::StorageId,
    page::PageRequest,
    query::Filter,
    store::DocumentStore,
};

#[derive(Debug)]
pub struct ClientAppService<B: StoreBackend> {
    store: Arc<DocumentStore<B>>,
    request_timeout: Option<Duration>,
}

impl<B: StoreBackend> Clone for ClientAppService<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            request_timeout: self.request_timeout,
        }
    }
}

impl<B: StoreBackend> ClientAppService<B> {
    pub fn new(store: Arc<DocumentStore<B>>) -> Self {
        Self { store, request_timeout: None }
    }

    /// Applies `timeout` to calls whose context carries no deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn clients(&self) -> TypedCollection<'_, B, ClientAppDocument> {
        self.store.typed_collection::<ClientAppDocument>()
    }

    fn deadline(&self, ctx: &CallContext) -> Option<Instant> {
        ctx.deadline()
            .or_else(|| {
                self.request_timeout
                    .and_then(|timeout| Instant::now().checked_add(timeout))
            })
    }
}

/// Awaits a store call, bounded by `deadline`, and maps its failure.
async fn guarded<T>(
    deadline: Option<Instant>,
    action: &'static str,
    call: impl Future<Output = StoreResult<T>>,
) -> ServiceResult<T> {
    let outcome = match deadline {
        Some(deadline) => timeout_at(deadline, call).await.map_err(|_| {
            warn!(action, "deadline elapsed before the store answered");
            ClientServiceError::DeadlineExceeded(format!("Deadline exceeded while trying to {action}"))
        })?,
        None => call.await,
    };

    outcome.map_err(|err| {
        warn!(action, error = %err, "store operation failed");
        ClientServiceError::internal(action, err)
    })
}

impl From<CreateClientRequest> for ClientAppDocument {
    fn from(request: CreateClientRequest) -> Self {
        ClientAppDocument {
            id: None,
            client_id: request.client_id,
            client_name: request.client_name,
            client_logo: request.client_logo,
            client_secret: request.client_secret,
            domains: request.domains,
            permissions: request.permissions,
            student_list: request.student_list,
        }
    }
}

fn replacement_document(id: StorageId, request: UpdateClientRequest) -> ClientAppDocument {
    ClientAppDocument {
        id: Some(id.object_id()),
        client_id: request.client_id,
        client_name: request.client_name,
        client_logo: request.client_logo,
        client_secret: request.client_secret,
        domains: request.domains,
        permissions: request.permissions,
        student_list: request.student_list,
    }
}

#[async_trait]
impl<B: StoreBackend> ClientApi for ClientAppService<B> {
    #[instrument(skip_all, fields(client_id = %request.client_id))]
    async fn create_client(&self, ctx: &CallContext, request: CreateClientRequest) -> ServiceResult<ClientApp> {
        let deadline = self.deadline(ctx);
        let document = ClientAppDocument::from(request);

        let inserted = guarded(deadline, "create client", self.clients().insert_one(&document)).await?;
        let Bson::ObjectId(oid) = inserted else {
            warn!(inserted = %inserted, "store returned a non-ObjectId identifier");
            return Err(ClientServiceError::Internal(format!(
                "Failed to convert inserted id {inserted} to ObjectId"
            )));
        };

        let client = document.into_client_app_with_id(StorageId::from(oid));
        debug!(id = %client.id, "Created client");

        Ok(client)
    }

    #[instrument(skip_all, fields(client_id = %request.client_id))]
    async fn get_client(&self, ctx: &CallContext, request: GetClientRequest) -> ServiceResult<ClientApp> {
        let deadline = self.deadline(ctx);
        let filter = Filter::eq(ClientAppDocument::CLIENT_ID_FIELD, request.client_id.as_str());

        let document = guarded(deadline, "get client", self.clients().find_one(filter))
            .await?
            .ok_or_else(ClientServiceError::client_not_found)?;

        let client = ClientApp::try_from(document)
            .map_err(|err| ClientServiceError::internal("get client", err))?;
        debug!(id = %client.id, "Got client");

        Ok(client)
    }

    #[instrument(skip_all, fields(id = %request.id, client_id = %request.client_id))]
    async fn update_client(&self, ctx: &CallContext, request: UpdateClientRequest) -> ServiceResult<ClientApp> {
        let id = StorageId::parse(&request.id)?;
        let deadline = self.deadline(ctx);
        let replacement = replacement_document(id, request);

        let filter = Filter::eq(ClientAppDocument::ID_FIELD, id.object_id())
            .and(Filter::eq(ClientAppDocument::CLIENT_ID_FIELD, replacement.client_id.as_str()));

        let matched = guarded(
            deadline,
            "update client",
            self.clients().replace_one(filter, &replacement),
        )
        .await?;

        if matched == 0 {
            // Tell a missing record apart from one stored under another client id.
            let stored = guarded(
                deadline,
                "update client",
                self.clients().find_one(Filter::eq(ClientAppDocument::ID_FIELD, id.object_id())),
            )
            .await?;

            return Err(match stored {
                Some(_) => ClientServiceError::client_id_mismatch(&replacement.client_id),
                None => ClientServiceError::client_not_found(),
            });
        }

        debug!("Replaced client");

        // Built from what was written; the store is not read back.
        Ok(replacement.into_client_app_with_id(id))
    }

    #[instrument(skip_all, fields(id = %request.id))]
    async fn delete_client(&self, ctx: &CallContext, request: DeleteClientRequest) -> ServiceResult<DeleteClientResponse> {
        let id = StorageId::parse(&request.id)?;
        let deadline = self.deadline(ctx);

        let deleted = guarded(
            deadline,
            "delete client",
            self.clients().delete_one(Filter::eq(ClientAppDocument::ID_FIELD, id.object_id())),
        )
        .await?;

        if deleted == 0 {
            return Err(ClientServiceError::client_not_found());
        }

        debug!("Deleted client");

        Ok(DeleteClientResponse { success: deleted == 1 })
    }

    #[instrument(skip_all, fields(page = request.page, page_size = request.page_size))]
    async fn list_clients(&self, ctx: &CallContext, request: ListClientsRequest) -> ServiceResult<ListClientsResponse> {
        let deadline = self.deadline(ctx);
        let window = PageRequest::new(request.page, request.page_size).window();

        let documents = guarded(
            deadline,
            "list clients",
            self.clients().find_many(Filter::all(), window),
        )
        .await?;

        let clients = documents
            .into_iter()
            .map(ClientApp::try_from)
            .collect::<StoreResult<Vec<_>>>()
            .map_err(|err| ClientServiceError::internal("decode client", err))?;

        let total_count = guarded(deadline, "count clients", self.clients().count(Filter::all())).await?;
        debug!(returned = clients.len(), total_count, "Listed clients");

        Ok(ListClientsResponse { clients, total_count })
    }
}
