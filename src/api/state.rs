//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{ServiceContainer, Services};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Redis connection; rate limiting is off without it
    pub cache: Option<Arc<Cache>>,
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the production state around one database pool.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config.clone(),
        ));

        Self {
            services,
            cache,
            database,
            config: Arc::new(config),
        }
    }

    /// State with injected services, used by tests.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        cache: Option<Arc<Cache>>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            services,
            cache,
            database,
            config: Arc::new(config),
        }
    }
}
