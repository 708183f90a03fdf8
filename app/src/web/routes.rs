// app/src/web/routes.rs

use actix_web::web;
use std::path::PathBuf;

use crate::web::handlers::{page_handlers, product_handlers};

// Called from `main.rs` (and the route tests) to configure the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(page_handlers::health_check_handler))
    // Product pages
    .route("/", web::get().to(product_handlers::list_products_handler))
    .service(
      web::resource("/create")
        .route(web::get().to(product_handlers::new_product_form_handler))
        .route(web::post().to(product_handlers::create_product_handler)),
    )
    .service(
      web::resource("/edit/{product_id}")
        .route(web::get().to(product_handlers::edit_product_form_handler))
        .route(web::post().to(product_handlers::update_product_handler)),
    )
    .route(
      "/delete/{product_id}",
      web::get().to(product_handlers::delete_product_handler),
    )
    // Static pages
    .route("/about", web::get().to(page_handlers::about_handler))
    .route("/contact", web::get().to(page_handlers::contact_handler))
    .default_service(web::to(page_handlers::not_found_handler));
}

/// Serves stored images under `/uploads/{file}`.
pub fn configure_uploads(upload_dir: PathBuf) -> impl FnOnce(&mut web::ServiceConfig) {
  move |cfg: &mut web::ServiceConfig| {
    cfg.service(actix_files::Files::new("/uploads", upload_dir));
  }
}
