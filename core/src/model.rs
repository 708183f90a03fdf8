// core/src/model.rs

//! Product records as persisted by a `ProductStore`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
  /// Generates a fresh id. Only store implementations should call this.
  pub fn generate() -> Self {
    ProductId(Uuid::new_v4())
  }

  /// Parses an id taken from a request path.
  ///
  /// Anything that is not a UUID is rejected with `StoreError::InvalidId`,
  /// which callers treat as "not found" rather than as a server error.
  pub fn parse(raw: &str) -> StoreResult<Self> {
    Uuid::parse_str(raw.trim())
      .map(ProductId)
      .map_err(|_| StoreError::InvalidId(raw.to_string()))
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl From<Uuid> for ProductId {
  fn from(value: Uuid) -> Self {
    ProductId(value)
  }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub description: String,
  pub image: Option<String>, // Stored file name inside the upload directory
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>, // Unset until the first edit
}

/// Fields of a record about to be inserted.
#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Full replacement of the mutable fields of an existing record.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
  pub name: String,
  pub description: String,
  pub image: Option<String>,
  pub updated_at: DateTime<Utc>,
}

/// Text fields submitted through the create and edit forms.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
  pub name: String,
  pub description: String,
}

impl ProductInput {
  pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      description: description.into(),
    }
  }
}
