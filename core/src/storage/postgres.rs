// core/src/storage/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, instrument};

use super::ProductStore;
use crate::error::{StoreError, StoreResult};
use crate::model::{NewProduct, Product, ProductId, ProductUpdate};

/// Connection settings for [`PgProductStore::connect`].
#[derive(Debug, Clone)]
pub struct PgStoreOptions {
  pub database_url: String,
  /// Overrides the database named in `database_url`.
  pub database_name: Option<String>,
  pub table: String,
  pub max_connections: u32,
  pub acquire_timeout: Duration,
}

impl PgStoreOptions {
  pub fn new(database_url: impl Into<String>) -> Self {
    Self {
      database_url: database_url.into(),
      database_name: None,
      table: "products".to_string(),
      max_connections: 5,
      acquire_timeout: Duration::from_secs(5),
    }
  }
}

/// Products kept in a single PostgreSQL table.
#[derive(Debug, Clone)]
pub struct PgProductStore {
  pool: PgPool,
  table: String,
}

impl PgProductStore {
  /// Wraps an existing pool. `table` must be a plain SQL identifier since it
  /// is interpolated into every statement.
  pub fn new(pool: PgPool, table: impl Into<String>) -> StoreResult<Self> {
    let table = table.into();
    if !is_plain_identifier(&table) {
      return Err(StoreError::Configuration(format!(
        "table name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
        table
      )));
    }
    Ok(Self { pool, table })
  }

  #[instrument(name = "pg_store::connect", skip(options), fields(table = %options.table))]
  pub async fn connect(options: &PgStoreOptions) -> StoreResult<Self> {
    let mut connect_options = PgConnectOptions::from_str(&options.database_url)
      .map_err(|e| StoreError::Configuration(format!("invalid database url: {}", e)))?;
    if let Some(name) = &options.database_name {
      connect_options = connect_options.database(name);
    }

    let pool = PgPoolOptions::new()
      .max_connections(options.max_connections)
      .acquire_timeout(options.acquire_timeout)
      .connect_with(connect_options)
      .await
      .map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        StoreError::from(e)
      })?;

    info!("Connected to the product database.");
    Self::new(pool, options.table.clone())
  }

  /// Creates the product table if it does not exist yet.
  pub async fn ensure_schema(&self) -> StoreResult<()> {
    sqlx::query(&create_table_statement(&self.table)).execute(&self.pool).await?;
    info!(table = %self.table, "Product table ready.");
    Ok(())
  }

  pub async fn close(&self) {
    self.pool.close().await;
  }

  fn select_columns(&self) -> String {
    format!(
      "SELECT id, name, description, image, created_at, updated_at FROM {}",
      self.table
    )
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  #[instrument(name = "pg_store::list_all", skip(self), err(Display))]
  async fn list_all(&self) -> StoreResult<Vec<Product>> {
    let sql = format!("{} {}", self.select_columns(), NEWEST_FIRST);
    let products = sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?;
    Ok(products)
  }

  #[instrument(name = "pg_store::find_by_id", skip(self), fields(product_id = %id), err(Display))]
  async fn find_by_id(&self, id: &ProductId) -> StoreResult<Option<Product>> {
    let sql = format!("{} WHERE id = $1", self.select_columns());
    let product = sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "pg_store::insert", skip_all, err(Display))]
  async fn insert(&self, product: NewProduct) -> StoreResult<ProductId> {
    let id = ProductId::generate();
    let sql = format!(
      "INSERT INTO {} (id, name, description, image, created_at) VALUES ($1, $2, $3, $4, $5)",
      self.table
    );
    sqlx::query(&sql)
      .bind(id)
      .bind(&product.name)
      .bind(&product.description)
      .bind(&product.image)
      .bind(product.created_at)
      .execute(&self.pool)
      .await?;
    Ok(id)
  }

  #[instrument(name = "pg_store::update_by_id", skip(self, update), fields(product_id = %id), err(Display))]
  async fn update_by_id(&self, id: &ProductId, update: ProductUpdate) -> StoreResult<bool> {
    let sql = format!(
      "UPDATE {} SET name = $2, description = $3, image = $4, updated_at = $5 WHERE id = $1",
      self.table
    );
    let result = sqlx::query(&sql)
      .bind(id)
      .bind(&update.name)
      .bind(&update.description)
      .bind(&update.image)
      .bind(update.updated_at)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg_store::delete_by_id", skip(self), fields(product_id = %id), err(Display))]
  async fn delete_by_id(&self, id: &ProductId) -> StoreResult<bool> {
    let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
    let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
    Ok(result.rows_affected() > 0)
  }
}

// `seq` breaks ties between rows created in the same microsecond.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, seq DESC";

fn create_table_statement(table: &str) -> String {
  format!(
    "CREATE TABLE IF NOT EXISTS {table} (
       id UUID PRIMARY KEY,
       seq BIGSERIAL NOT NULL,
       name TEXT NOT NULL,
       description TEXT NOT NULL,
       image TEXT,
       created_at TIMESTAMPTZ NOT NULL,
       updated_at TIMESTAMPTZ
     )",
    table = table
  )
}

fn is_plain_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
    _ => return false,
  }
  name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identifiers() {
    assert!(is_plain_identifier("products"));
    assert!(is_plain_identifier("_catalog_items2"));
    assert!(!is_plain_identifier(""));
    assert!(!is_plain_identifier("2products"));
    assert!(!is_plain_identifier("products; DROP TABLE users"));
    assert!(!is_plain_identifier("public.products"));
    assert!(!is_plain_identifier(&"p".repeat(64)));
  }

  #[test]
  fn listing_breaks_timestamp_ties_by_insertion_sequence() {
    assert!(NEWEST_FIRST.ends_with("created_at DESC, seq DESC"));
    assert!(create_table_statement("products").contains("seq BIGSERIAL"));
  }

  #[tokio::test]
  async fn rejects_unsafe_table_name() {
    // connect_lazy never touches the network.
    let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/catalog").unwrap();
    let result = PgProductStore::new(pool, "products--");
    assert!(matches!(result, Err(StoreError::Configuration(_))));
  }

  #[tokio::test]
  async fn malformed_url_is_a_configuration_error() {
    let options = PgStoreOptions::new("not a url");
    let result = PgProductStore::connect(&options).await;
    assert!(matches!(result, Err(StoreError::Configuration(_))));
  }
}
