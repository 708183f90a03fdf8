// src/lib.rs

//! Catalog: products with an optional image, and the use cases that manage them.
//!
//! The crate is split along the seams of the application:
//!  - `storage`: persisted product records behind the `ProductStore` trait
//!    (PostgreSQL through `sqlx`, or in memory).
//!  - `files`: the upload directory; validates, names, writes and removes images.
//!  - `service`: `ProductService`, the list/create/edit/delete use cases that keep
//!    records and image files consistent with each other.
//!  - `error`: the error taxonomy shared by the layers above.
//!
//! The HTTP layer lives in the `catalog_app` crate and only talks to `ProductService`.

pub mod error;
pub mod files;
pub mod model;
pub mod service;
pub mod storage;

// --- Re-exports for the Public API ---

pub use crate::error::{CatalogError, CatalogResult, FileStoreError, StoreError, StoreResult};
pub use crate::files::{FileStore, IncomingFile, MAX_IMAGE_BYTES};
pub use crate::model::{NewProduct, Product, ProductId, ProductInput, ProductUpdate};
pub use crate::service::ProductService;
pub use crate::storage::{MemoryProductStore, PgProductStore, PgStoreOptions, ProductStore};
