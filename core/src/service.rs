// core/src/service.rs

//! The four product use cases: list, create, edit and delete.
//!
//! The service owns the coupling between a record's `image` field and the
//! file in the upload directory:
//!  - a file written for a request that then fails is removed before the
//!    error is returned, so no upload is left unreferenced;
//!  - an image that is being replaced is removed only after the record no
//!    longer points at it;
//!  - on delete the file goes first, then the record.
//!
//! Concurrent edits of the same product are not coordinated; the last write
//! to reach the store wins.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::error::{CatalogError, CatalogResult, FileStoreError};
use crate::files::{self, FileStore, IncomingFile};
use crate::model::{NewProduct, Product, ProductId, ProductInput, ProductUpdate};
use crate::storage::ProductStore;

#[derive(Clone)]
pub struct ProductService {
  store: Arc<dyn ProductStore>,
  files: FileStore,
}

impl ProductService {
  pub fn new(store: Arc<dyn ProductStore>, files: FileStore) -> Self {
    Self { store, files }
  }

  /// All products, newest first. An empty catalog is not an error.
  #[instrument(name = "product_service::list", skip(self), err(Display))]
  pub async fn list(&self) -> CatalogResult<Vec<Product>> {
    let products = self.store.list_all().await?;
    info!("Fetched {} products.", products.len());
    Ok(products)
  }

  /// A single product, or `NotFound` for a malformed or unknown id.
  #[instrument(name = "product_service::get", skip(self), err(Display))]
  pub async fn get(&self, raw_id: &str) -> CatalogResult<Product> {
    let id = ProductId::parse(raw_id)?;
    self
      .store
      .find_by_id(&id)
      .await?
      .ok_or_else(|| CatalogError::NotFound(raw_id.to_string()))
  }

  #[instrument(name = "product_service::create", skip(self, input, upload), err(Display))]
  pub async fn create(&self, input: ProductInput, upload: Option<IncomingFile>) -> CatalogResult<ProductId> {
    let saved = self.save_upload(upload).await?;

    let result = async {
      let (name, description) = validate(&input)?;
      let id = self
        .store
        .insert(NewProduct {
          name,
          description,
          image: saved.clone(),
          created_at: Utc::now(),
        })
        .await?;
      Ok::<_, CatalogError>(id)
    }
    .await;

    match result {
      Ok(id) => {
        info!(product_id = %id, image = ?saved, "Product created.");
        Ok(id)
      }
      Err(e) => {
        self.discard_upload(saved.as_deref()).await;
        Err(e)
      }
    }
  }

  /// Replaces name, description and image of an existing product.
  ///
  /// `old_image` is the image the edit form was rendered with. It is kept when
  /// no new file is uploaded and must then still exist on disk. Once a new file
  /// has been recorded in its place it is removed, but only if the stored
  /// record actually pointed at it.
  #[instrument(name = "product_service::edit", skip(self, input, upload), err(Display))]
  pub async fn edit(
    &self,
    raw_id: &str,
    input: ProductInput,
    upload: Option<IncomingFile>,
    old_image: Option<String>,
  ) -> CatalogResult<()> {
    let id = ProductId::parse(raw_id)?;
    let old_image = old_image.filter(|name| !name.trim().is_empty());
    if let Some(name) = &old_image {
      if !files::is_valid_name(name) {
        warn!(old_image = %name, "Rejected edit with an invalid image reference.");
        return Err(CatalogError::Validation("Invalid image reference.".to_string()));
      }
      if upload.is_none() && !self.files.exists(name).await {
        warn!(old_image = %name, "Rejected edit keeping an image that is not on disk.");
        return Err(CatalogError::Validation(
          "The current image is no longer available. Please upload a new one.".to_string(),
        ));
      }
    }

    let stored = self
      .store
      .find_by_id(&id)
      .await?
      .ok_or_else(|| CatalogError::NotFound(raw_id.to_string()))?;

    let saved = self.save_upload(upload).await?;

    let result = async {
      let (name, description) = validate(&input)?;
      let update = ProductUpdate {
        name,
        description,
        image: saved.clone().or_else(|| old_image.clone()),
        updated_at: Utc::now(),
      };
      if self.store.update_by_id(&id, update).await? {
        Ok::<(), CatalogError>(())
      } else {
        Err(CatalogError::NotFound(raw_id.to_string()))
      }
    }
    .await;

    if let Err(e) = result {
      self.discard_upload(saved.as_deref()).await;
      return Err(e);
    }

    // The record now points at the new file; the old one is unreferenced.
    if let (Some(_), Some(previous)) = (&saved, &old_image) {
      if stored.image.as_deref() == Some(previous.as_str()) {
        if let Err(e) = self.files.delete(previous).await {
          warn!(error = %e, image = %previous, "Could not remove replaced image.");
        }
      } else {
        warn!(image = %previous, stored = ?stored.image, "Replaced image does not belong to this product; leaving it in place.");
      }
    }

    info!(product_id = %id, image = ?saved.as_ref().or(old_image.as_ref()), "Product updated.");
    Ok(())
  }

  /// Removes a product and its image. The image is deleted before the record.
  #[instrument(name = "product_service::delete", skip(self), err(Display))]
  pub async fn delete(&self, raw_id: &str) -> CatalogResult<()> {
    let id = ProductId::parse(raw_id)?;
    let product = self
      .store
      .find_by_id(&id)
      .await?
      .ok_or_else(|| CatalogError::NotFound(raw_id.to_string()))?;

    if let Some(image) = &product.image {
      match self.files.delete(image).await {
        Ok(_) => {}
        Err(FileStoreError::InvalidFileName(name)) => {
          warn!(product_id = %id, image = %name, "Record points outside the upload directory; skipping file removal.");
        }
        Err(e) => return Err(e.into()),
      }
    }

    if !self.store.delete_by_id(&id).await? {
      // Someone else removed it between the lookup and now.
      warn!(product_id = %id, "Product disappeared before it could be deleted.");
    }
    info!(product_id = %id, "Product deleted.");
    Ok(())
  }

  async fn save_upload(&self, upload: Option<IncomingFile>) -> CatalogResult<Option<String>> {
    match upload {
      Some(file) => Ok(Some(self.files.save(file).await?)),
      None => Ok(None),
    }
  }

  async fn discard_upload(&self, saved: Option<&str>) {
    if let Some(name) = saved {
      if let Err(e) = self.files.delete(name).await {
        error!(error = %e, image = %name, "Failed to remove upload of a rejected request.");
      }
    }
  }
}

fn validate(input: &ProductInput) -> CatalogResult<(String, String)> {
  let name = input.name.trim();
  let description = input.description.trim();
  if name.is_empty() || description.is_empty() {
    return Err(CatalogError::Validation(
      "Please fill in both the name and the description.".to_string(),
    ));
  }
  Ok((name.to_string(), description.to_string()))
}
