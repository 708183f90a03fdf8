// app/src/main.rs

use anyhow::Context;
use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use catalog::{FileStore, MemoryProductStore, PgProductStore, PgStoreOptions, ProductService, ProductStore};
use catalog_app::{web, AppConfig, AppState, StorageBackend};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting product catalog server...");

  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;

  // The upload directory is created once here, not per request.
  let files = FileStore::open(&app_config.upload_dir)
    .await
    .with_context(|| format!("Failed to prepare upload directory {}", app_config.upload_dir.display()))?;

  let (store, pg_store): (Arc<dyn ProductStore>, Option<PgProductStore>) = match app_config.storage_backend {
    StorageBackend::Postgres => {
      let mut options = PgStoreOptions::new(app_config.database_url.clone());
      options.database_name = app_config.database_name.clone();
      options.table = app_config.products_table.clone();
      options.max_connections = app_config.db_max_connections;

      let pg = PgProductStore::connect(&options)
        .await
        .context("Failed to connect to the database")?;
      pg.ensure_schema().await.context("Failed to prepare the product table")?;
      let store: Arc<dyn ProductStore> = Arc::new(pg.clone());
      (store, Some(pg))
    }
    StorageBackend::Memory => {
      tracing::warn!("Using the in-memory product store; records are lost on restart.");
      let store: Arc<dyn ProductStore> = Arc::new(MemoryProductStore::new());
      (store, None)
    }
  };

  let upload_dir = app_config.upload_dir.clone();
  let server_address = app_config.bind_address();
  let app_state = AppState::new(ProductService::new(store, files), app_config);

  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(web::error_pages()) // Error pages carry the configured site name
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_uploads(upload_dir.clone()))
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("HTTP server terminated with an error")?;

  // The server future resolves once a shutdown signal has drained the workers.
  if let Some(pg) = pg_store {
    pg.close().await;
    tracing::info!("Database connection closed.");
  }
  tracing::info!("Server stopped.");
  Ok(())
}
