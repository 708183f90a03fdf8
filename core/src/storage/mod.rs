// core/src/storage/mod.rs

//! The storage adapter: persisted product records behind the `ProductStore` trait.
//!
//! Two implementations ship with the crate:
//!  - [`PgProductStore`], a table in PostgreSQL accessed through an `sqlx` pool.
//!  - [`MemoryProductStore`], a process-local store used by tests and by the
//!    `memory` storage backend.
//!
//! Every operation is atomic for a single record only; nothing spans records.

pub mod memory;
pub mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::{PgProductStore, PgStoreOptions};

use crate::error::StoreResult;
use crate::model::{NewProduct, Product, ProductId, ProductUpdate};
use async_trait::async_trait;

#[async_trait]
pub trait ProductStore: Send + Sync {
  /// All products, newest first.
  async fn list_all(&self) -> StoreResult<Vec<Product>>;

  async fn find_by_id(&self, id: &ProductId) -> StoreResult<Option<Product>>;

  /// Persists a new record and returns the id the store generated for it.
  async fn insert(&self, product: NewProduct) -> StoreResult<ProductId>;

  /// Replaces the mutable fields. Returns `false` when no record matched.
  async fn update_by_id(&self, id: &ProductId, update: ProductUpdate) -> StoreResult<bool>;

  /// Returns `false` when no record matched.
  async fn delete_by_id(&self, id: &ProductId) -> StoreResult<bool>;
}
