use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::{StreamExt, TryStreamExt, stream};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};
use tracing::{debug, info};

use clientapps_core::{
    backend::{DocumentStream, StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    page::FindWindow,
    query::{Expr, QueryVisitor},
};

use crate::query::MongoQueryTranslator;

fn backend_error(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn translate(filter: &Expr) -> StoreResult<Document> {
        MongoQueryTranslator.visit_expr(filter)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Initialization(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_one(&self, document: Document, collection: &str) -> StoreResult<Bson> {
        Ok(
            self.get_collection(collection)
                .insert_one(document)
                .await
                .map_err(backend_error)?
                .inserted_id
        )
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(Self::translate(&filter)?)
            .await
            .map_err(backend_error)
    }

    async fn find_many(&self, filter: Expr, window: FindWindow, collection: &str) -> StoreResult<DocumentStream> {
        // The driver reads limit(0) as "no limit".
        if window.is_empty() {
            return Ok(stream::empty::<StoreResult<Document>>().boxed());
        }

        let mut options = FindOptions::default();
        options.skip = Some(window.skip);
        options.limit = Some(i64::try_from(window.limit).unwrap_or(i64::MAX));

        Ok(
            self.get_collection(collection)
                .find(Self::translate(&filter)?)
                .with_options(options)
                .await
                .map_err(backend_error)?
                .map_err(backend_error)
                .boxed()
        )
    }

    async fn replace_one(&self, filter: Expr, document: Document, collection: &str) -> StoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .replace_one(Self::translate(&filter)?, document)
                .await
                .map_err(backend_error)?
                .matched_count
        )
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .delete_one(Self::translate(&filter)?)
                .await
                .map_err(backend_error)?
                .deleted_count
        )
    }

    async fn count_documents(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        self.get_collection(collection)
            .count_documents(Self::translate(&filter)?)
            .await
            .map_err(backend_error)
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Connects and pings the database, so a misconfigured URI fails here
    /// rather than on the first request.
    async fn build(self) -> StoreResult<Self::Backend> {
        let store = MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| StoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| StoreError::Initialization(e.to_string()))?,
            self.database,
        );

        debug!(database = %store.database, "pinging MongoDB");
        store.ping().await?;
        info!(database = %store.database, "Connected to MongoDB");

        Ok(store)
    }
}
