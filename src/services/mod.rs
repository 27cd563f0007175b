//! Business logic services

pub mod auth;
pub mod catalog;

use std::sync::Arc;

use crate::{
    auth::TokenManager,
    repository::{CredentialStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository and token manager
    pub fn new(repository: Repository, tokens: TokenManager) -> Self {
        let store = Arc::new(repository.users.clone());
        Self::with_credential_store(repository, store, tokens)
    }

    /// Same as `new`, with staff credentials served by another store
    pub fn with_credential_store(
        repository: Repository,
        store: Arc<dyn CredentialStore>,
        tokens: TokenManager,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(store, tokens),
            catalog: catalog::CatalogService::new(repository),
        }
    }
}
