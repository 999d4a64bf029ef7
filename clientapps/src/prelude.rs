//! Convenient re-exports of commonly used types from clientapps.
//!
//! ```ignore
//! use clientapps::prelude::*;
//! ```

pub use clientapps_core::{
    api::{
        CallContext, ClientApi, CreateClientRequest, DeleteClientRequest, DeleteClientResponse,
        GetClientRequest, ListClientsRequest, ListClientsResponse, UpdateClientRequest,
    },
    backend::{StoreBackend, StoreBackendBuilder},
    client::{ClientApp, ClientAppDocument, Permissions, Student},
    error::{ClientServiceError, ErrorKind, ServiceResult, StoreError, StoreResult},
    ids::{BusinessId, StorageId},
    service::ClientAppService,
    store::DocumentStore,
};
