//! In-memory document storage backend for clientapps.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development
//! and tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Store-generated ids** - Documents inserted without `_id` get a fresh ObjectId
//! - **Stable order** - Documents are returned in insertion order
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use clientapps_core::{service::ClientAppService, store::DocumentStore};
//! use clientapps_memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let service = ClientAppService::new(Arc::new(store));
//! ```

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
