use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::store::DataSourceStore;

/// Shared handler context. Built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataSourceStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataSourceStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
