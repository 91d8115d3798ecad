//! Repository traits
//!
//! ドメイン層が必要とするデータアクセスの抽象化。
//! 具体的な実装は infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{
    entity::{Credential, Record},
    error::{IdentityError, RepositoryError},
    path::CollectionPath,
    value_object::{RecordId, SessionToken, UserId},
};

/// Storage for namespaced document collections.
///
/// Every mutation publishes the affected [`CollectionPath`] on the change feed
/// returned by [`DocumentRepository::subscribe`]. Watchers re-read the whole
/// collection on each notification; no diffs are published.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Store a new record
    async fn insert(&self, record: Record) -> Result<(), RepositoryError>;

    /// Fetch a single record, `None` when it does not exist
    async fn get(
        &self,
        path: &CollectionPath,
        id: &RecordId,
    ) -> Result<Option<Record>, RepositoryError>;

    /// Delete a record
    async fn delete(&self, path: &CollectionPath, id: &RecordId) -> Result<(), RepositoryError>;

    /// All records of a collection, in no particular order
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Record>, RepositoryError>;

    /// Change feed of collection paths touched by mutations
    fn subscribe(&self) -> broadcast::Receiver<CollectionPath>;
}

/// Identity service: user creation and session resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Create a fresh anonymous user and open a session for it
    async fn create_anonymous(&self) -> Result<Credential, IdentityError>;

    /// Redeem a one-time custom token and open a session for its user
    async fn redeem_custom_token(&self, token: &str) -> Result<Credential, IdentityError>;

    /// Resolve the user behind a session token
    async fn resolve_session(&self, token: &SessionToken) -> Result<UserId, IdentityError>;
}
