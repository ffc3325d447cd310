//! Application state management

use std::sync::Arc;

use crate::ai::client::TextGenerator;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    generator: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, generator }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the AI text generator
    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.inner.generator
    }
}
