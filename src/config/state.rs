// Application state module
// Holds the loaded configuration and the injected item store

use std::sync::Arc;

use super::types::Config;
use crate::db::ItemStore;

/// Application state shared by every connection task
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ItemStore>) -> Self {
        Self { config, store }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
