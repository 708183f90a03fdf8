// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Where product records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Postgres,
  Memory,
}

impl std::str::FromStr for StorageBackend {
  type Err = AppError;

  fn from_str(value: &str) -> Result<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
      "memory" => Ok(StorageBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_name: Option<String>,
  pub products_table: String,
  pub db_max_connections: u32,
  pub storage_backend: StorageBackend,
  pub upload_dir: PathBuf,
  pub site_name: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: "postgres://localhost:5432".to_string(),
      database_name: None,
      products_table: "products".to_string(),
      db_max_connections: 5,
      storage_backend: StorageBackend::Postgres,
      upload_dir: PathBuf::from("public/uploads"),
      site_name: "Product Catalog".to_string(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    let config = Self::from_lookup(|name| env::var(name).ok())?;
    tracing::info!("Application configuration loaded successfully.");
    Ok(config)
  }

  /// Builds the configuration from any variable source; unset variables fall
  /// back to the defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = Self::default();
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    let server_host = get("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match get("PORT").or_else(|| get("SERVER_PORT")) {
      Some(raw) => raw
        .trim()
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid PORT '{}': {}", raw, e)))?,
      None => defaults.server_port,
    };
    let database_url = get("DATABASE_URL").unwrap_or(defaults.database_url);
    let database_name = get("DB_NAME");
    let products_table = get("COLLECTION_NAME").unwrap_or(defaults.products_table);
    let db_max_connections = match get("DB_MAX_CONNECTIONS") {
      Some(raw) => raw
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS '{}'", raw)))?,
      None => defaults.db_max_connections,
    };
    let storage_backend = match get("STORAGE_BACKEND") {
      Some(raw) => raw.parse::<StorageBackend>()?,
      None => defaults.storage_backend,
    };
    let upload_dir = get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir);
    let site_name = get("SITE_NAME").unwrap_or(defaults.site_name);

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_name,
      products_table,
      db_max_connections,
      storage_backend,
      upload_dir,
      site_name,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
