use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::builds::{BuildEngine, SeaOrmBuildStore, SeaOrmCatalog};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub builds: Arc<BuildEngine>,
}

impl AppState {
    /// Wire the build engine to the SeaORM-backed store and catalog.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let store = SeaOrmBuildStore::new(db.clone(), config.builds.audit_events);
        let catalog = SeaOrmCatalog::new(db.clone());
        Self {
            builds: Arc::new(BuildEngine::new(Arc::new(store), Arc::new(catalog))),
            config: Arc::new(config),
            db,
        }
    }
}
