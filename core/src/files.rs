// core/src/files.rs

//! The upload directory for product images.
//!
//! Stored names are generated here and nowhere else, so a name is unique for
//! the lifetime of the directory. Callers only ever hand back names that
//! `save` returned; anything that could escape the root is refused.

use chrono::Utc;
use rand_core::{OsRng, RngCore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::error::FileStoreError;

/// Upper bound for a single image upload (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];
const NAME_ATTEMPTS: usize = 8;

/// An uploaded file as received from the client, fully buffered.
#[derive(Debug, Clone)]
pub struct IncomingFile {
  /// Client-side file name; only its extension is kept.
  pub file_name: String,
  pub content_type: String,
  pub data: Vec<u8>,
}

impl IncomingFile {
  pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
    Self {
      file_name: file_name.into(),
      content_type: content_type.into(),
      data,
    }
  }

  /// Lower-cased extension of the client file name, if it has one.
  pub fn extension(&self) -> Option<String> {
    Path::new(&self.file_name)
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| ext.to_ascii_lowercase())
  }
}

#[derive(Debug, Clone)]
pub struct FileStore {
  root: PathBuf,
}

impl FileStore {
  /// Opens the upload directory, creating it (and its parents) if absent.
  #[instrument(name = "file_store::open", skip_all, fields(root = %root.as_ref().display()))]
  pub async fn open(root: impl AsRef<Path>) -> Result<Self, FileStoreError> {
    let root = root.as_ref().to_path_buf();
    fs::create_dir_all(&root).await?;
    info!("Upload directory ready.");
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Validates and writes an upload, returning the generated file name.
  #[instrument(
    name = "file_store::save",
    skip(self, file),
    fields(client_name = %file.file_name, content_type = %file.content_type, size = file.data.len()),
    err(Display)
  )]
  pub async fn save(&self, file: IncomingFile) -> Result<String, FileStoreError> {
    let extension = check_image_type(&file)?;
    if file.data.len() > MAX_IMAGE_BYTES {
      return Err(FileStoreError::FileTooLarge {
        size: file.data.len(),
        limit: MAX_IMAGE_BYTES,
      });
    }

    for _ in 0..NAME_ATTEMPTS {
      let name = generate_name(&extension);
      let path = self.root.join(&name);
      // create_new makes a concurrent save with the same name fail instead of overwrite.
      let mut handle = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
        Ok(handle) => handle,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
          debug!(%name, "Generated name already taken, drawing another.");
          continue;
        }
        Err(e) => return Err(e.into()),
      };

      if let Err(e) = write_all(&mut handle, &file.data).await {
        drop(handle);
        let _ = fs::remove_file(&path).await;
        return Err(e.into());
      }
      info!(stored_name = %name, "Stored uploaded image.");
      return Ok(name);
    }

    Err(FileStoreError::NameExhausted {
      attempts: NAME_ATTEMPTS,
    })
  }

  /// Removes a stored file. Returns `false` if there was nothing to remove.
  #[instrument(name = "file_store::delete", skip(self), err(Display))]
  pub async fn delete(&self, name: &str) -> Result<bool, FileStoreError> {
    let path = self.path_of(name)?;
    match fs::remove_file(&path).await {
      Ok(()) => {
        info!("Deleted stored image.");
        Ok(true)
      }
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!("Stored image already absent.");
        Ok(false)
      }
      Err(e) => {
        warn!(error = %e, "Failed to delete stored image.");
        Err(e.into())
      }
    }
  }

  pub async fn exists(&self, name: &str) -> bool {
    match self.path_of(name) {
      Ok(path) => fs::try_exists(path).await.unwrap_or(false),
      Err(_) => false,
    }
  }

  /// Absolute location of a stored name under the root.
  pub fn path_of(&self, name: &str) -> Result<PathBuf, FileStoreError> {
    if !is_valid_name(name) {
      return Err(FileStoreError::InvalidFileName(name.to_string()));
    }
    Ok(self.root.join(name))
  }
}

/// A stored name is a single, non-empty path component.
pub fn is_valid_name(name: &str) -> bool {
  !name.is_empty()
    && name != "."
    && name != ".."
    && !name.contains(['/', '\\', '\0'])
    && !name.starts_with('.')
}

async fn write_all(handle: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
  handle.write_all(data).await?;
  handle.flush().await?;
  handle.sync_all().await
}

fn check_image_type(file: &IncomingFile) -> Result<String, FileStoreError> {
  let content_type = file.content_type.trim().to_ascii_lowercase();
  match file.extension() {
    Some(ext)
      if ALLOWED_EXTENSIONS.contains(&ext.as_str()) && ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) =>
    {
      Ok(ext)
    }
    _ => Err(FileStoreError::UnsupportedFileType {
      file_name: file.file_name.clone(),
      content_type: file.content_type.clone(),
    }),
  }
}

fn generate_name(extension: &str) -> String {
  let suffix = OsRng.next_u32() % 1_000_000_000;
  format!("image-{}-{}.{}", Utc::now().timestamp_millis(), suffix, extension)
}
