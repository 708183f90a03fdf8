// app/src/state.rs
use crate::config::AppConfig;
use catalog::ProductService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub products: ProductService,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(products: ProductService, config: AppConfig) -> Self {
    Self {
      products,
      config: Arc::new(config),
    }
  }

  pub fn site_name(&self) -> &str {
    &self.config.site_name
  }
}
