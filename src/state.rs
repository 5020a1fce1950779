use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use crate::auth::tokens::TokenManager;
use crate::config::Config;
use crate::email::SystemMailer;
use crate::storage::ImageStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub tokens: TokenManager,
    pub images: ImageStore,
    pub system_mailer: Option<Arc<SystemMailer>>,
}

impl AppState {
    pub fn reset_ttl(&self) -> Duration {
        Duration::minutes(self.config.reset_ttl_minutes)
    }
}
