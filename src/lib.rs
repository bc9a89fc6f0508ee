pub mod api;
pub mod config;
pub mod crypto;
pub mod db;

pub use db::DbPool;

use config::Config;
use std::sync::Arc;

use crate::api::token::TokenIssuer;
use crate::db::{CredentialStore, SqlCredentialStore};

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub credentials: Arc<dyn CredentialStore>,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let credentials = Arc::new(SqlCredentialStore::new(db.clone()));
        Self {
            config,
            db,
            credentials,
            tokens: TokenIssuer::new(),
        }
    }

    /// Replace the credential store (e.g. with a different backend)
    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = store;
        self
    }
}
