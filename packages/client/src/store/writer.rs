//! Document writer
//!
//! Binds a [`DocumentStore`] to the site namespace and the current identity.
//! Every record is stored under `artifacts/{app_id}/public/data/{collection}`
//! and stamped with the caller as author. Deletes are checked for ownership
//! here before the store enforces the same rule.

use std::sync::Arc;

use coachdesk_server::domain::{
    AppId, CollectionName, CollectionPath, Record, RecordFields, RecordId, UserId,
};

use crate::{
    backend::{DocumentStore, SnapshotStream},
    error::ClientError,
};

/// Message board collection
pub const MESSAGES: &str = "messages";

/// Contact form submissions
pub const CONTACTS: &str = "contacts";

#[derive(Clone)]
pub struct DocumentWriter {
    store: Arc<dyn DocumentStore>,
    app_id: AppId,
    identity: Option<UserId>,
}

impl DocumentWriter {
    pub fn new(store: Arc<dyn DocumentStore>, app_id: AppId, identity: Option<UserId>) -> Self {
        Self {
            store,
            app_id,
            identity,
        }
    }

    pub fn identity(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    fn path(&self, collection: &str) -> Result<CollectionPath, ClientError> {
        let name = CollectionName::new(collection.to_string())
            .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
        Ok(CollectionPath::new(self.app_id.clone(), name))
    }

    fn caller(&self) -> Result<&UserId, ClientError> {
        self.identity.as_ref().ok_or(ClientError::NotReady)
    }

    /// Store `fields` as a new record authored by the current identity
    ///
    /// # Returns
    ///
    /// * `Ok(RecordId)` - id assigned by the store
    /// * `Err(ClientError::NotReady)` - no identity yet
    /// * `Err(ClientError::RemoteWriteFailed)` - the store refused or was unreachable
    pub async fn append(
        &self,
        collection: &str,
        fields: RecordFields,
    ) -> Result<RecordId, ClientError> {
        let caller = self.caller()?;
        let path = self.path(collection)?;
        let id = self.store.create(&path, caller, fields).await?;
        tracing::debug!("Appended '{}' to {}", id, path);
        Ok(id)
    }

    /// Live snapshots of a collection; order is whatever the store returns
    pub fn list(&self, collection: &str) -> Result<SnapshotStream, ClientError> {
        self.caller()?;
        let path = self.path(collection)?;
        Ok(self.store.watch(&path))
    }

    /// Delete a record authored by the current identity
    ///
    /// A record that does not exist or belongs to someone else yields
    /// [`ClientError::Forbidden`] without touching the store.
    pub async fn remove(&self, collection: &str, id: &RecordId) -> Result<(), ClientError> {
        let caller = self.caller()?;
        let path = self.path(collection)?;

        let owned = self
            .store
            .get(&path, id)
            .await
            .map_err(|e| match e {
                ClientError::RemoteReadFailed(msg) => ClientError::RemoteWriteFailed(msg),
                other => other,
            })?
            .is_some_and(|record| record.is_owned_by(caller));
        if !owned {
            tracing::warn!("Refusing to delete '{}' from {}: not owned by '{}'", id, path, caller);
            return Err(ClientError::Forbidden);
        }

        self.store.delete(&path, id, caller).await
    }
}

/// Order records oldest first; ties keep a stable id order
pub fn sort_by_created_at(records: &mut [Record]) {
    records.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
}
