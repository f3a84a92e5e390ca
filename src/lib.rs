use std::sync::Arc;

use auth::{Guard, TokenKeys};
use config::Config;
use database::AdminStore;

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod router;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AdminStore>,
    pub config: Config,
    pub tokens: Arc<TokenKeys>,
    pub guard: Guard,
}

impl AppState {
    pub fn new(store: Arc<dyn AdminStore>, config: Config) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenKeys::from_config(&config)),
            guard: Guard::new(config.elevated_role),
            config,
        }
    }
}
