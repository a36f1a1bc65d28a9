use broadcast::Manager;
use config::Config;
use std::sync::Arc;

pub mod config;
pub mod logging;

// Service-level state shared by every request handler.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub broadcast_manager: Arc<Manager>,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        Self::with_manager(app_config, Arc::new(Manager::new()))
    }

    pub fn with_manager(app_config: Config, manager: Arc<Manager>) -> Self {
        Self {
            config: app_config,
            broadcast_manager: manager,
        }
    }

    pub fn broadcast_manager(&self) -> &Manager {
        self.broadcast_manager.as_ref()
    }
}
