use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::RowStore;
use crate::services::Mailer;

/// Shared, read-only dependencies injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RowStore>,
    pub verifier: Arc<TokenVerifier>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RowStore>,
        verifier: TokenVerifier,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            verifier: Arc::new(verifier),
            mailer,
        }
    }
}
