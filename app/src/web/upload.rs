// app/src/web/upload.rs

//! Reads the multipart body of the create and edit forms.

use actix_multipart::Multipart;
use catalog::{CatalogError, IncomingFile, ProductInput, MAX_IMAGE_BYTES};
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Text fields can't legitimately be anywhere near this size.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Everything a product form can submit.
#[derive(Debug, Default)]
pub struct ProductSubmission {
  pub name: String,
  pub description: String,
  pub old_image: Option<String>,
  pub image: Option<IncomingFile>,
}

impl ProductSubmission {
  pub fn input(&self) -> ProductInput {
    ProductInput::new(self.name.clone(), self.description.clone())
  }
}

/// Why the body could not be turned into a `ProductSubmission`.
#[derive(Debug)]
pub enum SubmissionError {
  /// The upload was rejected; the fields read so far are kept for re-rendering.
  Rejected {
    partial: ProductSubmission,
    error: CatalogError,
  },
  Malformed(AppError),
}

impl From<actix_multipart::MultipartError> for SubmissionError {
  fn from(err: actix_multipart::MultipartError) -> Self {
    SubmissionError::Malformed(err.into())
  }
}

pub async fn read_submission(mut payload: Multipart) -> Result<ProductSubmission, SubmissionError> {
  let mut submission = ProductSubmission::default();

  while let Some(item) = payload.next().await {
    let mut field = item?;
    let field_name = field.name().unwrap_or_default().to_string();

    match field_name.as_str() {
      "image" => {
        let file_name = field
          .content_disposition()
          .and_then(|cd| cd.get_filename())
          .unwrap_or_default()
          .to_string();
        let content_type = field
          .content_type()
          .map(|mime| mime.essence_str().to_string())
          .unwrap_or_default();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
          let chunk = chunk?;
          if data.len() + chunk.len() > MAX_IMAGE_BYTES {
            warn!(%file_name, "Upload exceeds the image size limit; rejecting.");
            return Err(SubmissionError::Rejected {
              partial: submission,
              error: CatalogError::FileTooLarge {
                limit_mib: MAX_IMAGE_BYTES / (1024 * 1024),
              },
            });
          }
          data.extend_from_slice(&chunk);
        }

        // Browsers send an empty part when no file was chosen.
        if file_name.is_empty() && data.is_empty() {
          continue;
        }
        debug!(%file_name, %content_type, size = data.len(), "Received image part.");
        submission.image = Some(IncomingFile::new(file_name, content_type, data));
      }
      "name" | "description" | "oldImage" => {
        let value = read_text(&mut field).await?;
        match field_name.as_str() {
          "name" => submission.name = value,
          "description" => submission.description = value,
          _ => submission.old_image = Some(value).filter(|v| !v.is_empty()),
        }
      }
      other => {
        debug!(field = %other, "Ignoring unexpected form field.");
        while let Some(chunk) = field.next().await {
          chunk?;
        }
      }
    }
  }

  Ok(submission)
}

async fn read_text(field: &mut actix_multipart::Field) -> Result<String, SubmissionError> {
  let mut bytes = Vec::new();
  while let Some(chunk) = field.next().await {
    let chunk = chunk?;
    if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
      return Err(SubmissionError::Malformed(AppError::Validation(
        "A form field is too long.".to_string(),
      )));
    }
    bytes.extend_from_slice(&chunk);
  }
  String::from_utf8(bytes)
    .map_err(|_| SubmissionError::Malformed(AppError::Validation("Form fields must be valid UTF-8.".to_string())))
}
