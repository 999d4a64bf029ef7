//! Core of the client application record service.
//!
//! This crate provides:
//!
//! - **Identifiers** ([`ids`]) - Distinct business and storage identifier types
//! - **Records** ([`client`]) - The client application wire record and its persisted document
//! - **Document traits** ([`document`]) - BSON encoding for stored types
//! - **Store backend abstraction** ([`backend`]) - The primitives a document store must offer
//! - **Filters** ([`query`]) - Backend-neutral filter expressions
//! - **Pagination** ([`page`]) - Page requests and the skip/limit windows they map to
//! - **Collections and store** ([`collection`], [`store`]) - Typed access to a shared backend
//! - **Contract** ([`api`]) - Requests, responses and the [`api::ClientApi`] trait
//! - **Service** ([`service`]) - [`service::ClientAppService`], the implementation of the contract
//! - **Errors** ([`error`]) - Store errors and the service error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use clientapps_core::{api::*, service::ClientAppService, store::DocumentStore};
//!
//! let service = ClientAppService::new(Arc::new(DocumentStore::new(backend)));
//! let created = service
//!     .create_client(&CallContext::background(), CreateClientRequest {
//!         client_id: "112122060".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! service
//!     .delete_client(&CallContext::background(), DeleteClientRequest { id: created.id.to_hex() })
//!     .await?;
//! ```

pub mod api;
pub mod backend;
pub mod client;
pub mod collection;
pub mod document;
pub mod error;
pub mod ids;
pub mod page;
pub mod query;
pub mod service;
pub mod store;
