use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Store;
use crate::jsonapi::RelationshipRegistry;

/// Shared handler state. Cheap to clone; everything sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub registry: Arc<RelationshipRegistry>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            registry: Arc::new(RelationshipRegistry::default()),
            config: Arc::new(config),
        }
    }
}
