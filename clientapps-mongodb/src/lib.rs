//! MongoDB backend implementation for clientapps.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait
//! on top of the official async driver.
//!
//! To use this backend, include the `mongodb` feature of the `clientapps` crate:
//!
//! ```toml
//! [dependencies]
//! clientapps = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The builder takes a connection string and a database name, connects, and
//! pings the database before handing the store out.
//!
//! # Example
//!
//! ```ignore
//! use clientapps::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "lynxDev")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
