//! clientapps-demo - runs one client application through its full lifecycle.
//!
//! Creates a record, reads it back by business id, replaces it, lists the
//! first page of the collection and finally deletes the record. Every
//! response is printed as JSON on stdout.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use clientapps::{
    config::{BackendKind, DemoConfig},
    memory::InMemoryStore,
    prelude::*,
    telemetry::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = DemoConfig::parse();

    init_logging(config.verbose, config.json_logs);
    config.validate()?;

    match config.backend {
        BackendKind::Memory => {
            let backend = InMemoryStore::builder().build().await?;
            run(backend, &config).await
        }
        #[cfg(feature = "mongodb")]
        BackendKind::Mongodb => {
            use clientapps::mongodb::MongoDbStore;

            let backend = MongoDbStore::builder(&config.mongodb_uri, &config.database)
                .build()
                .await
                .context("connecting to MongoDB")?;
            run(backend, &config).await
        }
        #[cfg(not(feature = "mongodb"))]
        BackendKind::Mongodb => bail!("this binary was built without the `mongodb` feature"),
    }
}

async fn run<B: StoreBackend>(backend: B, config: &DemoConfig) -> Result<()> {
    let store = Arc::new(DocumentStore::new(backend));
    let mut service = ClientAppService::new(store.clone());
    if let Some(timeout) = config.request_timeout() {
        service = service.with_request_timeout(timeout);
    }

    lifecycle(&service).await?;

    drop(service);
    match Arc::try_unwrap(store) {
        Ok(store) => store.shutdown().await?,
        Err(_) => bail!("store is still shared at shutdown"),
    }

    Ok(())
}

async fn lifecycle(service: &impl ClientApi) -> Result<()> {
    let ctx = CallContext::background();

    let created = service
        .create_client(&ctx, CreateClientRequest {
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
                ..Default::default()
            },
            student_list: vec![
                Student::new(150, "unique-student-id-150"),
                Student::new(200, "unique-student-id-200"),
            ],
        })
        .await
        .context("create client")?;
    info!(id = %created.id, client_id = %created.client_id, "created client");
    print("created", &created)?;

    let fetched = service
        .get_client(&ctx, GetClientRequest { client_id: created.client_id.clone() })
        .await
        .context("get client")?;
    print("fetched", &fetched)?;

    let updated = service
        .update_client(&ctx, UpdateClientRequest {
            id: created.id.to_hex(),
            client_id: created.client_id.clone(),
            client_name: "Updated Client Name".into(),
            client_logo: "https://example.com/updated-logo.png".into(),
            client_secret: "updatedsecret".into(),
            domains: vec!["updated.com".into(), "newdomain.com".into()],
            permissions: Permissions {
                roll_no: true,
                name: true,
                gender: true,
                nationality: true,
                picture_url: true,
                dob: true,
                ..Default::default()
            },
            student_list: vec![Student::new(201, "updated-student-id-1")],
        })
        .await
        .context("update client")?;
    print("updated", &updated)?;

    let listed = service
        .list_clients(&ctx, ListClientsRequest { page: 1, page_size: 10 })
        .await
        .context("list clients")?;
    print("listed", &listed)?;

    let deleted = service
        .delete_client(&ctx, DeleteClientRequest { id: created.id.to_hex() })
        .await
        .context("delete client")?;
    print("deleted", &deleted)?;

    Ok(())
}

fn print(label: &str, value: &impl Serialize) -> Result<()> {
    println!("{label}:\n{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
