// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use async_trait::async_trait;
use catalog::{
  FileStore, MemoryProductStore, NewProduct, Product, ProductId, ProductService, ProductStore, ProductUpdate,
  StoreError, StoreResult,
};
use catalog_app::{AppConfig, AppState, StorageBackend};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

// --- Application wired to an in-memory store and a temporary upload dir ---
pub struct TestContext {
  pub state: AppState,
  pub store: Arc<MemoryProductStore>,
  pub files: FileStore,
  pub dir: TempDir,
}

impl TestContext {
  pub async fn new() -> Self {
    let store = Arc::new(MemoryProductStore::new());
    Self::with_store(store.clone(), store).await
  }

  /// Serves requests from `serving`; `store` is only kept for assertions.
  pub async fn with_store(serving: Arc<dyn ProductStore>, store: Arc<MemoryProductStore>) -> Self {
    setup_tracing();
    let dir = tempfile::tempdir().expect("create temp dir");
    let upload_dir = dir.path().join("uploads");
    let files = FileStore::open(&upload_dir).await.expect("open file store");
    let config = AppConfig {
      storage_backend: StorageBackend::Memory,
      upload_dir,
      site_name: "Test Catalog".to_string(),
      ..AppConfig::default()
    };
    let state = AppState::new(ProductService::new(serving, files.clone()), config);
    Self {
      state,
      store,
      files,
      dir,
    }
  }

  pub fn upload_count(&self) -> usize {
    std::fs::read_dir(self.files.root()).map(|entries| entries.count()).unwrap_or(0)
  }

  pub async fn products(&self) -> Vec<Product> {
    self.store.list_all().await.unwrap()
  }
}

/// Builds the full application around a `TestContext`.
macro_rules! test_app {
  ($ctx:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($ctx.state.clone()))
        .wrap(catalog_app::web::error_pages())
        .configure(catalog_app::web::configure_uploads($ctx.files.root().to_path_buf()))
        .configure(catalog_app::web::configure_app_routes),
    )
    .await
  };
}

// --- A store whose database is gone ---
pub struct UnreachableStore;

#[async_trait]
impl ProductStore for UnreachableStore {
  async fn list_all(&self) -> StoreResult<Vec<Product>> {
    Err(StoreError::Unavailable("connection refused (db.internal:5432)".to_string()))
  }

  async fn find_by_id(&self, _id: &ProductId) -> StoreResult<Option<Product>> {
    Err(StoreError::Unavailable("connection refused (db.internal:5432)".to_string()))
  }

  async fn insert(&self, _product: NewProduct) -> StoreResult<ProductId> {
    Err(StoreError::Unavailable("connection refused (db.internal:5432)".to_string()))
  }

  async fn update_by_id(&self, _id: &ProductId, _update: ProductUpdate) -> StoreResult<bool> {
    Err(StoreError::Unavailable("connection refused (db.internal:5432)".to_string()))
  }

  async fn delete_by_id(&self, _id: &ProductId) -> StoreResult<bool> {
    Err(StoreError::Unavailable("connection refused (db.internal:5432)".to_string()))
  }
}

// --- multipart/form-data bodies ---
pub const BOUNDARY: &str = "----catalog-test-boundary";

#[derive(Default)]
pub struct MultipartBody {
  bytes: Vec<u8>,
}

impl MultipartBody {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn text(mut self, name: &str, value: &str) -> Self {
    self.bytes.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
      )
      .as_bytes(),
    );
    self
  }

  pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
    self.bytes.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        BOUNDARY, name, file_name, content_type
      )
      .as_bytes(),
    );
    self.bytes.extend_from_slice(data);
    self.bytes.extend_from_slice(b"\r\n");
    self
  }

  /// Returns the `Content-Type` header value and the encoded body.
  pub fn finish(mut self) -> (String, Vec<u8>) {
    self.bytes.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), self.bytes)
  }
}

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
