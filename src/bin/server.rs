//! ERP server: builds the resource registry, picks a store (in-memory
//! or PostgreSQL from DATABASE_URL), and mounts common + resource routes.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use erp_sdk::{
    catalog, common_routes, ensure_database_exists, resource_routes, AppState, DocumentStore,
    MemoryStore, PgStore, Pipeline, Registry,
};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("erp_sdk=info".parse()?))
        .init();

    let registry = Arc::new(Registry::new(catalog())?);
    tracing::info!(resources = registry.len(), "catalog loaded");

    let store: Arc<dyn DocumentStore> = match std::env::var("STORE").as_deref() {
        Ok("memory") => {
            let store = MemoryStore::new();
            store.ensure_collections(&registry);
            tracing::info!("using in-memory store");
            Arc::new(store)
        }
        _ => {
            let database_url = std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/erp".into());
            ensure_database_exists(&database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;
            let store = PgStore::new(pool);
            store.ensure_collections(&registry).await?;
            tracing::info!("using postgres store");
            Arc::new(store)
        }
    };

    let timeout_ms: u64 = std::env::var("ERP_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10_000);
    let pipeline = Pipeline::with_timeout(store.clone(), Duration::from_millis(timeout_ms));
    let state = AppState::with_pipeline(registry, store, pipeline);

    let app = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", resource_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));

    let bind = std::env::var("ERP_BIND").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
