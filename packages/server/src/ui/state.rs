//! Server state shared by every handler.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    config::CustomTokenArg,
    domain::{DocumentRepository, IdentityRepository},
    infrastructure::repository::{InMemoryDocumentRepository, InMemoryIdentityRepository},
};

/// Query parameters for WebSocket watch connections
#[derive(Debug, Deserialize)]
pub struct WatchQuery {
    /// Session token (browsers cannot set headers on WebSocket upgrades)
    pub token: Option<String>,
}

/// Shared application state
pub struct AppState {
    /// Document store（データアクセス層の抽象化）
    pub documents: Arc<dyn DocumentRepository>,
    /// Identity service
    pub identity: Arc<dyn IdentityRepository>,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        identity: Arc<dyn IdentityRepository>,
    ) -> Self {
        Self {
            documents,
            identity,
        }
    }

    /// In-memory store with the given custom tokens pre-issued
    pub fn in_memory(custom_tokens: &[CustomTokenArg]) -> Self {
        let identity = InMemoryIdentityRepository::with_custom_tokens(
            custom_tokens
                .iter()
                .map(|grant| (grant.token.clone(), grant.user_id.clone())),
        );
        Self::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(identity),
        )
    }
}
