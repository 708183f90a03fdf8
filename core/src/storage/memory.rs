// core/src/storage/memory.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use super::ProductStore;
use crate::error::StoreResult;
use crate::model::{NewProduct, Product, ProductId, ProductUpdate};

/// Process-local product store.
///
/// Records are kept in insertion order, so listing simply walks the vector
/// backwards. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
  records: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.records.read().is_empty()
  }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
  async fn list_all(&self) -> StoreResult<Vec<Product>> {
    Ok(self.records.read().iter().rev().cloned().collect())
  }

  async fn find_by_id(&self, id: &ProductId) -> StoreResult<Option<Product>> {
    Ok(self.records.read().iter().find(|p| p.id == *id).cloned())
  }

  #[instrument(name = "memory_store::insert", skip_all)]
  async fn insert(&self, product: NewProduct) -> StoreResult<ProductId> {
    let id = ProductId::generate();
    self.records.write().push(Product {
      id,
      name: product.name,
      description: product.description,
      image: product.image,
      created_at: product.created_at,
      updated_at: None,
    });
    debug!(product_id = %id, "Inserted product.");
    Ok(id)
  }

  async fn update_by_id(&self, id: &ProductId, update: ProductUpdate) -> StoreResult<bool> {
    let mut guard = self.records.write();
    match guard.iter_mut().find(|p| p.id == *id) {
      Some(record) => {
        record.name = update.name;
        record.description = update.description;
        record.image = update.image;
        record.updated_at = Some(update.updated_at);
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete_by_id(&self, id: &ProductId) -> StoreResult<bool> {
    let mut guard = self.records.write();
    let before = guard.len();
    guard.retain(|p| p.id != *id);
    Ok(guard.len() != before)
  }
}
