// app/src/web/handlers/page_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{instrument, warn};

use super::product_handlers::html;
use crate::state::AppState;
use crate::web::views;

pub async fn about_handler(app_state: web::Data<AppState>) -> HttpResponse {
  html(StatusCode::OK, views::about(app_state.site_name()))
}

pub async fn contact_handler(app_state: web::Data<AppState>) -> HttpResponse {
  html(StatusCode::OK, views::contact(app_state.site_name()))
}

// Liveness only; it does not probe the database.
pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Fallback for every path no route matched.
#[instrument(name = "handler::not_found", skip_all, fields(path = %req.path()))]
pub async fn not_found_handler(req: HttpRequest, app_state: web::Data<AppState>) -> HttpResponse {
  warn!("No route for request.");
  html(
    StatusCode::NOT_FOUND,
    views::error_page(app_state.site_name(), "The page you are looking for does not exist."),
  )
}
