use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use tracing::{info, warn};

use crate::config::{AdminCredentials, AppConfig, StoreBackend};
use crate::users::{
    memory::InMemoryUserStore,
    repo::{PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        if config.admin.is_default() {
            warn!("using default admin credentials; set ADMIN_USERNAME and ADMIN_PASSWORD");
        }

        let store = match config.store {
            StoreBackend::Postgres => {
                let db_cfg = config
                    .database
                    .as_ref()
                    .context("postgres backend selected without database settings")?;
                Arc::new(PgUserStore::connect(db_cfg).await?) as Arc<dyn UserStore>
            }
            StoreBackend::Memory => {
                info!("using in-memory user store; data is lost on restart");
                Arc::new(InMemoryUserStore::new()) as Arc<dyn UserStore>
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// In-memory state with `admin`/`admin` credentials.
    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            store: StoreBackend::Memory,
            database: None,
            admin: AdminCredentials::new("admin", "admin"),
        });
        Self::from_parts(Arc::new(InMemoryUserStore::new()), config)
    }
}

impl FromRef<AppState> for AdminCredentials {
    fn from_ref(state: &AppState) -> Self {
        state.config.admin.clone()
    }
}
