use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::db::Store;

pub struct AppState {
    pub store: Store,
    pub config: AppConfig,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(store: Store, config: AppConfig) -> Self {
        let tokens = TokenKeys::from_secret(&config.access_token_secret);
        Self {
            store,
            config,
            tokens,
        }
    }
}
