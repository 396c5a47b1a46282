use crate::{config::Config, infrastructure::providers::DetectionProvider};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn DetectionProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn DetectionProvider>) -> Self {
        Self { config, provider }
    }
}
