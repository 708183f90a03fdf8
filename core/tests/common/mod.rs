// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use async_trait::async_trait;
use catalog::{
  FileStore, IncomingFile, MemoryProductStore, NewProduct, Product, ProductId, ProductService, ProductStore,
  ProductUpdate, StoreError, StoreResult,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

// --- Store wrapper that can be told to fail ---
#[derive(Debug, Default)]
pub struct FlakyStore {
  pub inner: MemoryProductStore,
  pub fail_inserts: AtomicBool,
  pub fail_updates: AtomicBool,
  pub fail_reads: AtomicBool,
}

impl FlakyStore {
  fn check(flag: &AtomicBool) -> StoreResult<()> {
    if flag.load(Ordering::SeqCst) {
      Err(StoreError::Unavailable("injected failure".to_string()))
    } else {
      Ok(())
    }
  }
}

#[async_trait]
impl ProductStore for FlakyStore {
  async fn list_all(&self) -> StoreResult<Vec<Product>> {
    Self::check(&self.fail_reads)?;
    self.inner.list_all().await
  }

  async fn find_by_id(&self, id: &ProductId) -> StoreResult<Option<Product>> {
    Self::check(&self.fail_reads)?;
    self.inner.find_by_id(id).await
  }

  async fn insert(&self, product: NewProduct) -> StoreResult<ProductId> {
    Self::check(&self.fail_inserts)?;
    self.inner.insert(product).await
  }

  async fn update_by_id(&self, id: &ProductId, update: ProductUpdate) -> StoreResult<bool> {
    Self::check(&self.fail_updates)?;
    self.inner.update_by_id(id, update).await
  }

  async fn delete_by_id(&self, id: &ProductId) -> StoreResult<bool> {
    self.inner.delete_by_id(id).await
  }
}

// --- Service wired to a temporary upload directory ---
pub struct TestCatalog {
  pub service: ProductService,
  pub store: Arc<FlakyStore>,
  pub files: FileStore,
  pub dir: TempDir, // Dropped last; removes the upload directory
}

impl TestCatalog {
  pub async fn new() -> Self {
    setup_tracing();
    let dir = tempfile::tempdir().expect("create temp upload dir");
    let files = FileStore::open(dir.path().join("uploads")).await.expect("open file store");
    let store = Arc::new(FlakyStore::default());
    let service = ProductService::new(store.clone(), files.clone());
    Self {
      service,
      store,
      files,
      dir,
    }
  }

  pub fn upload_count(&self) -> usize {
    count_files(self.files.root())
  }

  /// Puts a file into the upload directory as if an earlier request had stored it.
  pub fn place_file(&self, name: &str) {
    std::fs::write(self.files.root().join(name), b"previous image").expect("place file");
  }

  pub async fn product(&self, id: &ProductId) -> Product {
    self.store.inner.find_by_id(id).await.unwrap().expect("product exists")
  }
}

pub fn count_files(dir: &Path) -> usize {
  std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

// --- Upload fixtures ---
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

pub fn png_upload() -> IncomingFile {
  IncomingFile::new("photo.png", "image/png", PNG_BYTES.to_vec())
}

pub fn gif_upload() -> IncomingFile {
  IncomingFile::new("spinner.GIF", "image/gif", b"GIF89a....".to_vec())
}

pub fn text_upload() -> IncomingFile {
  IncomingFile::new("notes.txt", "text/plain", b"not an image".to_vec())
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
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
