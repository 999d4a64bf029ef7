//! Client application record service.
//!
//! This crate is the entry point of the clientapps workspace. It re-exports the
//! record service and its contract from `clientapps-core`, the store backends,
//! and carries the configuration and logging setup used by the
//! `clientapps-demo` binary.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use clientapps::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(DocumentStore::new(InMemoryStore::builder().build().await?));
//!     let service = ClientAppService::new(store);
//!     let ctx = CallContext::background();
//!
//!     let created = service
//!         .create_client(&ctx, CreateClientRequest {
//!             client_id: "112122060".into(),
//!             client_name: "Client Akilesh".into(),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     // Get looks up by business id, Update and Delete by storage id.
//!     let fetched = service
//!         .get_client(&ctx, GetClientRequest { client_id: created.client_id.clone() })
//!         .await?;
//!     assert_eq!(fetched.id, created.id);
//!
//!     service
//!         .delete_client(&ctx, DeleteClientRequest { id: created.id.to_hex() })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB backend (requires the `mongodb` feature)

pub mod config;
pub mod prelude;
pub mod telemetry;

pub use clientapps_core::{api, backend, client, collection, document, error, ids, page, query, service, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use clientapps_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use clientapps_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
