// app/src/web/error_pages.rs

use actix_web::dev::ServiceResponse;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::web;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::product_handlers::html;
use crate::web::views;

/// Re-renders pages produced from an `AppError` under the configured site name.
/// Responses that did not come from an `AppError` pass through untouched.
pub fn error_pages<B: 'static>() -> ErrorHandlers<B> {
  ErrorHandlers::new().default_handler(render_with_site_name)
}

fn render_with_site_name<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
  let (req, res) = res.into_parts();

  let page = match (
    res.error().and_then(|e| e.as_error::<AppError>()),
    req.app_data::<web::Data<AppState>>(),
  ) {
    (Some(app_error), Some(state)) => Some(html(
      res.status(),
      views::error_page(state.site_name(), &app_error.public_message()),
    )),
    _ => None,
  };

  let res = match page {
    Some(page) => ServiceResponse::new(req, page).map_into_right_body(),
    None => ServiceResponse::new(req, res).map_into_left_body(),
  };
  Ok(ErrorHandlerResponse::Response(res))
}
