// app/src/web/mod.rs

// Declare child modules
pub mod error_pages;
pub mod handlers;
pub mod routes;
pub mod upload;
pub mod views;

pub use error_pages::error_pages;
pub use routes::{configure_app_routes, configure_uploads};
