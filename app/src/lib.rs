// app/src/lib.rs

//! HTTP front end of the product catalog: configuration, application state,
//! actix-web routes and the server-rendered pages.

pub mod config;
pub mod errors;
pub mod state;
pub mod web;

pub use crate::config::{AppConfig, StorageBackend};
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
