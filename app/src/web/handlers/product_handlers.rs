// app/src/web/handlers/product_handlers.rs

use actix_multipart::Multipart;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse};
use catalog::{CatalogError, ProductId};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::upload::{self, ProductSubmission, SubmissionError};
use crate::web::views::{self, ProductForm};

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
  HttpResponse::build(status)
    .content_type(header::ContentType::html())
    .body(body)
}

fn redirect_home() -> HttpResponse {
  HttpResponse::Found().insert_header((header::LOCATION, "/")).finish()
}

fn form_values(id: Option<String>, submission: &ProductSubmission) -> ProductForm {
  ProductForm {
    id,
    name: submission.name.clone(),
    description: submission.description.clone(),
    image: submission.old_image.clone(),
  }
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.products.list().await?;
  Ok(html(StatusCode::OK, views::home(app_state.site_name(), &products)))
}

#[instrument(name = "handler::new_product_form", skip(app_state))]
pub async fn new_product_form_handler(app_state: web::Data<AppState>) -> HttpResponse {
  html(
    StatusCode::OK,
    views::create_form(app_state.site_name(), &ProductForm::default(), None),
  )
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let site = app_state.site_name();

  let submission = match upload::read_submission(payload).await {
    Ok(submission) => submission,
    Err(SubmissionError::Rejected { partial, error }) => {
      let form = form_values(None, &partial);
      return Ok(html(
        StatusCode::BAD_REQUEST,
        views::create_form(site, &form, Some(&error.to_string())),
      ));
    }
    Err(SubmissionError::Malformed(e)) => return Err(e),
  };

  let mut form = form_values(None, &submission);
  form.image = None;

  match app_state.products.create(submission.input(), submission.image).await {
    Ok(id) => {
      info!(product_id = %id, "Product created, redirecting to the list.");
      Ok(redirect_home())
    }
    Err(e) if e.is_user_correctable() => {
      warn!(error = %e, "Create form rejected.");
      Ok(html(
        StatusCode::BAD_REQUEST,
        views::create_form(site, &form, Some(&e.to_string())),
      ))
    }
    Err(e) => Err(e.into()),
  }
}

#[instrument(name = "handler::edit_product_form", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn edit_product_form_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let raw_id = path.into_inner();
  let product = app_state.products.get(&raw_id).await?;
  Ok(html(
    StatusCode::OK,
    views::edit_form(app_state.site_name(), &ProductForm::from(&product), None),
  ))
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let raw_id = path.into_inner();
  // Unknown id formats are a 404 no matter what the body contains.
  if ProductId::parse(&raw_id).is_err() {
    warn!("Malformed product id on update.");
    return Err(CatalogError::NotFound(raw_id).into());
  }
  let site = app_state.site_name();

  let submission = match upload::read_submission(payload).await {
    Ok(submission) => submission,
    Err(SubmissionError::Rejected { partial, error }) => {
      let form = form_values(Some(raw_id), &partial);
      return Ok(html(
        StatusCode::BAD_REQUEST,
        views::edit_form(site, &form, Some(&error.to_string())),
      ));
    }
    Err(SubmissionError::Malformed(e)) => return Err(e),
  };

  let form = form_values(Some(raw_id.clone()), &submission);
  let input = submission.input();

  match app_state
    .products
    .edit(&raw_id, input, submission.image, submission.old_image)
    .await
  {
    Ok(()) => {
      info!("Product updated, redirecting to the list.");
      Ok(redirect_home())
    }
    Err(e) if e.is_user_correctable() => {
      warn!(error = %e, "Edit form rejected.");
      Ok(html(
        StatusCode::BAD_REQUEST,
        views::edit_form(site, &form, Some(&e.to_string())),
      ))
    }
    Err(e) => Err(e.into()),
  }
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let raw_id = path.into_inner();
  app_state.products.delete(&raw_id).await?;
  info!("Product deleted, redirecting to the list.");
  Ok(redirect_home())
}
