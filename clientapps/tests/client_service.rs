use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use bson::{Bson, Document};
use futures::future::pending;

use clientapps::{
    backend::DocumentStream,
    memory::InMemoryStore,
    page::FindWindow,
    prelude::*,
    query::Expr,
};

/// Delegates to an in-memory store and counts every call that reaches it.
#[derive(Debug, Clone, Default)]
struct CountingBackend {
    inner: InMemoryStore,
    calls: Arc<AtomicUsize>,
}

impl CountingBackend {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreBackend for CountingBackend {
    async fn insert_one(&self, document: Document, collection: &str) -> StoreResult<Bson> {
        self.hit();
        self.inner.insert_one(document, collection).await
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>> {
        self.hit();
        self.inner.find_one(filter, collection).await
    }

    async fn find_many(&self, filter: Expr, window: FindWindow, collection: &str) -> StoreResult<DocumentStream> {
        self.hit();
        self.inner.find_many(filter, window, collection).await
    }

    async fn replace_one(&self, filter: Expr, document: Document, collection: &str) -> StoreResult<u64> {
        self.hit();
        self.inner.replace_one(filter, document, collection).await
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        self.hit();
        self.inner.delete_one(filter, collection).await
    }

    async fn count_documents(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        self.hit();
        self.inner.count_documents(filter, collection).await
    }
}

/// Accepts every call and never answers.
#[derive(Debug)]
struct StalledBackend;

#[async_trait]
impl StoreBackend for StalledBackend {
    async fn insert_one(&self, _document: Document, _collection: &str) -> StoreResult<Bson> {
        pending().await
    }

    async fn find_one(&self, _filter: Expr, _collection: &str) -> StoreResult<Option<Document>> {
        pending().await
    }

    async fn find_many(&self, _filter: Expr, _window: FindWindow, _collection: &str) -> StoreResult<DocumentStream> {
        pending().await
    }

    async fn replace_one(&self, _filter: Expr, _document: Document, _collection: &str) -> StoreResult<u64> {
        pending().await
    }

    async fn delete_one(&self, _filter: Expr, _collection: &str) -> StoreResult<u64> {
        pending().await
    }

    async fn count_documents(&self, _filter: Expr, _collection: &str) -> StoreResult<u64> {
        pending().await
    }
}

fn service() -> ClientAppService<InMemoryStore> {
    ClientAppService::new(Arc::new(DocumentStore::new(InMemoryStore::new())))
}

fn akilesh() -> CreateClientRequest {
    CreateClientRequest {
        client_id: "112122060".into(),
        client_name: "Client Akilesh".into(),
        client_logo: "https://example.com/logo12345.png".into(),
        client_secret: "lolpog123".into(),
        domains: vec!["amazon.com".into(), "flipkart.com".into()],
        permissions: Permissions {
            roll_no: true,
            name: true,
            department_id: true,
            mobile_no: true,
            address: true,
            ..Permissions::default()
        },
        student_list: vec![
            Student::new(150, "unique-student-id-150"),
            Student::new(200, "unique-student-id-200"),
        ],
    }
}

fn numbered(n: usize) -> CreateClientRequest {
    CreateClientRequest {
        client_id: format!("client-{n}").into(),
        client_name: format!("Client {n}"),
        ..CreateClientRequest::default()
    }
}

fn update_of(created: &ClientApp) -> UpdateClientRequest {
    UpdateClientRequest {
        id: created.id.to_hex(),
        client_id: created.client_id.clone(),
        client_name: "Updated Client Name".into(),
        client_logo: "https://example.com/updated-logo.png".into(),
        client_secret: "updatedsecret".into(),
        domains: vec!["updated.com".into(), "newdomain.com".into()],
        permissions: Permissions {
            gender: true,
            dob: true,
            ..Permissions::default()
        },
        student_list: vec![Student::new(201, "updated-student-id-1")],
    }
}

#[tokio::test]
async fn full_lifecycle() {
    let service = service();
    let ctx = CallContext::background();

    let created = service.create_client(&ctx, akilesh()).await.unwrap();
    assert_eq!(created.client_id.as_str(), "112122060");
    assert_eq!(created.id.to_hex().len(), 24);
    assert_eq!(created.domains, vec!["amazon.com", "flipkart.com"]);

    let fetched = service
        .get_client(&ctx, GetClientRequest { client_id: "112122060".into() })
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let updated = service.update_client(&ctx, update_of(&created)).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.client_name, "Updated Client Name");

    let listed = service
        .list_clients(&ctx, ListClientsRequest { page: 1, page_size: 10 })
        .await
        .unwrap();
    assert_eq!(listed.total_count, 1);
    assert_eq!(listed.clients, vec![updated.clone()]);

    let deleted = service
        .delete_client(&ctx, DeleteClientRequest { id: created.id.to_hex() })
        .await
        .unwrap();
    assert!(deleted.success);

    let listed = service
        .list_clients(&ctx, ListClientsRequest { page: 1, page_size: 10 })
        .await
        .unwrap();
    assert_eq!(listed.total_count, 0);
    assert!(listed.clients.is_empty());
}

#[tokio::test]
async fn unknown_business_id_is_not_found() {
    let err = service()
        .get_client(&CallContext::background(), GetClientRequest { client_id: "nobody".into() })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err, ClientServiceError::NotFound("Client not found".into()));
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let service = service();
    let ctx = CallContext::background();
    let created = service.create_client(&ctx, akilesh()).await.unwrap();
    let request = DeleteClientRequest { id: created.id.to_hex() };

    assert!(service.delete_client(&ctx, request.clone()).await.unwrap().success);

    let err = service
        .get_client(&ctx, GetClientRequest { client_id: created.client_id.clone() })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service.delete_client(&ctx, request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn malformed_storage_ids_never_reach_the_store() {
    let backend = CountingBackend::default();
    let service = ClientAppService::new(Arc::new(DocumentStore::new(backend.clone())));
    let ctx = CallContext::background();

    for id in ["", "abc", "65f1c0ffee0000000000000", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
        let err = service
            .delete_client(&ctx, DeleteClientRequest { id: id.to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "delete with id {id:?}");

        let err = service
            .update_client(&ctx, UpdateClientRequest {
                id: id.to_string(),
                client_id: "112122060".into(),
                ..UpdateClientRequest::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "update with id {id:?}");
    }

    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn list_pages_through_the_collection() {
    let service = service();
    let ctx = CallContext::background();
    for n in 0..5 {
        service.create_client(&ctx, numbered(n)).await.unwrap();
    }

    let list = |page, page_size| {
        let service = service.clone();
        async move {
            service
                .list_clients(&CallContext::background(), ListClientsRequest { page, page_size })
                .await
                .unwrap()
        }
    };

    let first = list(1, 2).await;
    let second = list(2, 2).await;
    let last = list(3, 2).await;

    assert_eq!(first.clients.len(), 2);
    assert_eq!(second.clients.len(), 2);
    assert_eq!(last.clients.len(), 1);
    for page in [&first, &second, &last] {
        assert_eq!(page.total_count, 5);
    }

    let ids = first
        .clients
        .iter()
        .chain(&second.clients)
        .chain(&last.clients)
        .map(|client| client.id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 5);

    // Non-positive pages start at the beginning of the collection.
    assert_eq!(list(0, 2).await.clients, first.clients);
    assert_eq!(list(-3, 2).await.clients, first.clients);

    let empty = list(1, 0).await;
    assert!(empty.clients.is_empty());
    assert_eq!(empty.total_count, 5);

    assert!(list(1, -1).await.clients.is_empty());
    assert!(list(4, 2).await.clients.is_empty());
}

#[tokio::test]
async fn update_replaces_the_whole_record() {
    let service = service();
    let ctx = CallContext::background();
    let created = service.create_client(&ctx, akilesh()).await.unwrap();

    let updated = service.update_client(&ctx, update_of(&created)).await.unwrap();
    assert_eq!(updated.student_list, vec![Student::new(201, "updated-student-id-1")]);
    assert!(!updated.permissions.roll_no);
    assert_eq!(updated.permissions.granted(), 2);

    let fetched = service
        .get_client(&ctx, GetClientRequest { client_id: created.client_id.clone() })
        .await
        .unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_cannot_change_business_id() {
    let service = service();
    let ctx = CallContext::background();
    let created = service.create_client(&ctx, akilesh()).await.unwrap();

    let mut request = update_of(&created);
    request.client_id = "someone-else".into();

    let err = service.update_client(&ctx, request).await.unwrap_err();
    assert_eq!(
        err,
        ClientServiceError::NotFound("Client id \"someone-else\" does not match the stored record".into())
    );

    let fetched = service
        .get_client(&ctx, GetClientRequest { client_id: created.client_id.clone() })
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let err = service()
        .update_client(&CallContext::background(), UpdateClientRequest {
            id: bson::oid::ObjectId::new().to_hex(),
            client_id: "112122060".into(),
            ..UpdateClientRequest::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err, ClientServiceError::NotFound("Client not found".into()));
}

#[tokio::test]
async fn malformed_stored_document_is_internal() {
    let backend = InMemoryStore::new();
    backend
        .insert_one(bson::doc! { "clientId": "bad", "domains": 5 }, "clientapps")
        .await
        .unwrap();
    let service = ClientAppService::new(Arc::new(DocumentStore::new(backend)));
    let ctx = CallContext::background();

    let err = service
        .get_client(&ctx, GetClientRequest { client_id: "bad".into() })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().starts_with("Internal error: Failed to get client: Serialization error"));

    let err = service
        .list_clients(&ctx, ListClientsRequest { page: 1, page_size: 10 })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().starts_with("Internal error: Failed to list clients"));
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let service = service();

    let handles = (0..16)
        .map(|n| {
            let service = service.clone();
            tokio::spawn(async move { service.create_client(&CallContext::background(), numbered(n)).await })
        })
        .collect::<Vec<_>>();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap().id);
    }
    assert_eq!(ids.len(), 16);

    let listed = service
        .list_clients(&CallContext::background(), ListClientsRequest { page: 1, page_size: 100 })
        .await
        .unwrap();
    assert_eq!(listed.total_count, 16);
}

#[tokio::test]
async fn stalled_store_yields_deadline_exceeded() {
    let service = ClientAppService::new(Arc::new(DocumentStore::new(StalledBackend)))
        .with_request_timeout(Duration::from_millis(50));
    let ctx = CallContext::background();

    let err = service.create_client(&ctx, akilesh()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);

    // A caller deadline takes precedence over the service default.
    let err = service
        .list_clients(
            &CallContext::with_timeout(Duration::from_millis(10)),
            ListClientsRequest { page: 1, page_size: 10 },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
}
