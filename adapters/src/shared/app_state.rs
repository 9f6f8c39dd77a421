use std::sync::Arc;

use tempmod_application::{infrastructure_config::Config, store::ModerationStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub moderation_store: ModerationStore,
}

impl AppState {
    pub fn new(config: Arc<Config>, moderation_store: ModerationStore) -> Self {
        Self {
            config,
            moderation_store,
        }
    }
}
