// app/src/errors.rs

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use catalog::CatalogError;
use thiserror::Error;

use crate::web::views;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Malformed form submission: {0}")]
  Upload(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Catalog Error: {source}")]
  Catalog {
    #[from]
    source: CatalogError,
  },
}

impl From<actix_multipart::MultipartError> for AppError {
  fn from(err: actix_multipart::MultipartError) -> Self {
    AppError::Upload(err.to_string())
  }
}

impl AppError {
  /// Message safe to show on the rendered page. Internal details stay in the logs.
  pub(crate) fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) => m.clone(),
      AppError::Upload(_) => "The form could not be read. Please try again.".to_string(),
      AppError::Catalog { source } => match source {
        CatalogError::NotFound(_) => "The page or product you are looking for does not exist.".to_string(),
        e if e.is_user_correctable() => e.to_string(),
        _ => "Something went wrong on our side. Please try again later.".to_string(),
      },
      AppError::Config(_) => "Something went wrong on our side. Please try again later.".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::Upload(_) => StatusCode::BAD_REQUEST,
      AppError::Catalog { source } => match source {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_user_correctable() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error page");
    } else {
      tracing::warn!(application_error = %self, "Responding with error page");
    }
    // `web::error_pages` swaps in the configured site name when the app is wrapped with it.
    HttpResponse::build(status)
      .content_type(ContentType::html())
      .body(views::error_page(views::DEFAULT_SITE_NAME, &self.public_message()))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  #[test]
  fn malformed_id_maps_to_not_found() {
    let err = AppError::from(CatalogError::NotFound("abc".to_string()));
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn user_errors_are_bad_requests() {
    let err = AppError::from(CatalogError::UnsupportedFileType);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::Upload("boundary".into()).status_code(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn storage_outage_renders_generic_page() {
    let err = AppError::from(CatalogError::StorageUnavailable("connection refused at 10.0.0.5".to_string()));
    let response = err.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(response.into_body()).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Something went wrong"));
    assert!(!html.contains("10.0.0.5"));
  }
}
