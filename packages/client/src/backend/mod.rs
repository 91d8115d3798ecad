//! Backend abstraction: identity service plus document store.
//!
//! [`Backend::connect`] turns a [`StoreConfig`] into a [`Connection`]. The
//! session bootstrapper and the document writer only talk to the traits, so
//! the same code runs against a remote server ([`RemoteBackend`]) or an
//! in-process store ([`LocalBackend`]).

pub mod local;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use coachdesk_server::domain::{CollectionPath, Record, RecordFields, RecordId, UserId};
use futures_util::stream::BoxStream;
use tokio::sync::watch;

use crate::{config::StoreConfig, error::ClientError};

pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Live view of a collection: one full snapshot per change, in store order
pub type SnapshotStream = BoxStream<'static, Result<Vec<Record>, ClientError>>;

/// Handles obtained from a successful connect
#[derive(Clone)]
pub struct Connection {
    pub identity: Arc<dyn IdentityClient>,
    pub store: Arc<dyn DocumentStore>,
}

/// Entry point of a backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Open the identity and store handles
    ///
    /// Fails with [`ClientError::ConnectionInitFailed`].
    async fn connect(&self, config: &StoreConfig) -> Result<Connection, ClientError>;
}

/// Identity service as seen by the site
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Identity changes; `None` while signed out.
    ///
    /// A restored session shows up as the initial value.
    fn subscribe(&self) -> watch::Receiver<Option<UserId>>;

    /// Create a fresh anonymous identity
    async fn sign_in_anonymously(&self) -> Result<UserId, ClientError>;

    /// Redeem a one-time custom token
    async fn sign_in_with_custom_token(&self, token: &str) -> Result<UserId, ClientError>;
}

/// Namespaced document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a record; the store assigns id and timestamp.
    ///
    /// `author` is the identity the caller believes it holds; remote stores
    /// derive the author from the session instead.
    async fn create(
        &self,
        path: &CollectionPath,
        author: &UserId,
        fields: RecordFields,
    ) -> Result<RecordId, ClientError>;

    /// Fetch one record, `None` when it does not exist
    async fn get(&self, path: &CollectionPath, id: &RecordId)
    -> Result<Option<Record>, ClientError>;

    /// Delete a record; the store rejects callers other than the author
    async fn delete(
        &self,
        path: &CollectionPath,
        id: &RecordId,
        caller: &UserId,
    ) -> Result<(), ClientError>;

    /// Lazily opened live watch; nothing is contacted until first poll
    fn watch(&self, path: &CollectionPath) -> SnapshotStream;
}
