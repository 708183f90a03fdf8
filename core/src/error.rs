// core/src/error.rs
use thiserror::Error;

/// Errors raised by a `ProductStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Malformed product id: {0}")]
  InvalidId(String),

  #[error("Product storage is unavailable: {0}")]
  Unavailable(String),

  #[error("Invalid storage configuration: {0}")]
  Configuration(String),

  #[error("Storage backend error: {source}")]
  Backend {
    #[source]
    source: sqlx::Error,
  },
}

impl From<sqlx::Error> for StoreError {
  fn from(err: sqlx::Error) -> Self {
    // Connection-level failures mean the database cannot be reached at all.
    match err {
      sqlx::Error::Io(_)
      | sqlx::Error::Tls(_)
      | sqlx::Error::PoolTimedOut
      | sqlx::Error::PoolClosed
      | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
      other => StoreError::Backend { source: other },
    }
  }
}

/// Errors raised by the upload directory.
#[derive(Debug, Error)]
pub enum FileStoreError {
  #[error("Only jpeg, jpg, png and gif images are accepted (got '{file_name}', {content_type})")]
  UnsupportedFileType { file_name: String, content_type: String },

  #[error("Image is {size} bytes; the limit is {limit} bytes")]
  FileTooLarge { size: usize, limit: usize },

  #[error("Invalid stored file name: '{0}'")]
  InvalidFileName(String),

  #[error("Could not allocate a unique file name after {attempts} attempts")]
  NameExhausted { attempts: usize },

  #[error("Upload directory I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors surfaced by the product use cases.
///
/// `Validation`, `UnsupportedFileType` and `FileTooLarge` are user-correctable;
/// `NotFound` maps to a not-found page; everything else is an internal failure.
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("{0}")]
  Validation(String),

  #[error("Product not found: {0}")]
  NotFound(String),

  #[error("Only image files (jpeg, jpg, png, gif) can be uploaded.")]
  UnsupportedFileType,

  #[error("The image is larger than the {limit_mib} MiB limit.")]
  FileTooLarge { limit_mib: usize },

  #[error("Product storage is unavailable: {0}")]
  StorageUnavailable(String),

  #[error("Storage error: {0}")]
  Storage(StoreError),

  #[error("File store error: {0}")]
  Files(FileStoreError),
}

impl CatalogError {
  /// True when the user can fix the problem by resubmitting the form.
  pub fn is_user_correctable(&self) -> bool {
    matches!(
      self,
      CatalogError::Validation(_) | CatalogError::UnsupportedFileType | CatalogError::FileTooLarge { .. }
    )
  }
}

impl From<StoreError> for CatalogError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::InvalidId(raw) => CatalogError::NotFound(raw),
      StoreError::Unavailable(reason) => CatalogError::StorageUnavailable(reason),
      other => CatalogError::Storage(other),
    }
  }
}

impl From<FileStoreError> for CatalogError {
  fn from(err: FileStoreError) -> Self {
    match err {
      FileStoreError::UnsupportedFileType { .. } => CatalogError::UnsupportedFileType,
      FileStoreError::FileTooLarge { limit, .. } => CatalogError::FileTooLarge {
        limit_mib: limit / (1024 * 1024),
      },
      other => CatalogError::Files(other),
    }
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn malformed_id_becomes_not_found() {
    let err: CatalogError = StoreError::InvalidId("abc".to_string()).into();
    assert!(matches!(err, CatalogError::NotFound(ref raw) if raw == "abc"));
  }

  #[test]
  fn pool_timeout_is_unavailable() {
    let err: StoreError = sqlx::Error::PoolTimedOut.into();
    assert!(matches!(err, StoreError::Unavailable(_)));
    let err: CatalogError = err.into();
    assert!(matches!(err, CatalogError::StorageUnavailable(_)));
  }

  #[test]
  fn row_not_found_is_a_backend_error() {
    let err: StoreError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, StoreError::Backend { .. }));
  }

  #[test]
  fn upload_rejections_are_user_correctable() {
    let too_large: CatalogError = FileStoreError::FileTooLarge {
      size: 6 * 1024 * 1024,
      limit: 5 * 1024 * 1024,
    }
    .into();
    assert!(matches!(too_large, CatalogError::FileTooLarge { limit_mib: 5 }));
    assert!(too_large.is_user_correctable());

    let wrong_type: CatalogError = FileStoreError::UnsupportedFileType {
      file_name: "notes.txt".to_string(),
      content_type: "text/plain".to_string(),
    }
    .into();
    assert!(wrong_type.is_user_correctable());

    let io: CatalogError = FileStoreError::Io(std::io::Error::other("disk full")).into();
    assert!(!io.is_user_correctable());
  }
}
