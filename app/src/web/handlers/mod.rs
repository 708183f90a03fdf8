// app/src/web/handlers/mod.rs

// Declare handler modules
pub mod page_handlers;
pub mod product_handlers;
