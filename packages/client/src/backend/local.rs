//! In-process backend.
//!
//! Drives the server's use cases directly against its repositories, without a
//! network hop. Used for offline runs and by the client's own tests. The last
//! session is remembered across connects, so a reload returns as the same user.

use std::sync::Arc;

use async_trait::async_trait;
use coachdesk_server::{
    domain::{
        CollectionPath, DocumentRepository, IdentityRepository, Record, RecordFields, RecordId,
        SessionToken, UserId,
    },
    infrastructure::repository::{InMemoryDocumentRepository, InMemoryIdentityRepository},
    usecase::{
        AppendRecordUseCase, GetRecordUseCase, ListRecordsUseCase, ReadRecordError,
        RemoveRecordError, RemoveRecordUseCase, ResolveSessionUseCase, SignInMethod,
        SignInUseCase,
    },
};
use futures_util::{StreamExt, stream};
use tokio::sync::{Mutex, broadcast, watch};

use crate::{config::StoreConfig, error::ClientError};

use super::{Backend, Connection, DocumentStore, IdentityClient, SnapshotStream};

/// Backend running the store inside the client process
pub struct LocalBackend {
    documents: Arc<dyn DocumentRepository>,
    identity: Arc<dyn IdentityRepository>,
    remembered: Arc<Mutex<Option<SessionToken>>>,
}

impl LocalBackend {
    pub fn new(documents: Arc<dyn DocumentRepository>, identity: Arc<dyn IdentityRepository>) -> Self {
        Self {
            documents,
            identity,
            remembered: Arc::new(Mutex::new(None)),
        }
    }

    /// Fresh HashMap-backed store and identity service
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(InMemoryIdentityRepository::new()),
        )
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn connect(&self, config: &StoreConfig) -> Result<Connection, ClientError> {
        tracing::info!("Using in-process store (endpoint '{}')", config.endpoint);

        let remembered = self.remembered.lock().await.clone();
        let restored = match remembered {
            Some(token) => ResolveSessionUseCase::new(self.identity.clone())
                .execute(Some(token.as_str()))
                .await
                .ok(),
            None => None,
        };
        if let Some(uid) = &restored {
            tracing::info!("Restored session for '{}'", uid);
        }

        let (user, _) = watch::channel(restored);
        let identity = LocalIdentity {
            sign_in: SignInUseCase::new(self.identity.clone()),
            user,
            remembered: self.remembered.clone(),
        };
        let store = LocalStore {
            documents: self.documents.clone(),
        };
        Ok(Connection {
            identity: Arc::new(identity),
            store: Arc::new(store),
        })
    }
}

struct LocalIdentity {
    sign_in: SignInUseCase,
    user: watch::Sender<Option<UserId>>,
    remembered: Arc<Mutex<Option<SessionToken>>>,
}

impl LocalIdentity {
    async fn sign_in(&self, method: SignInMethod) -> Result<UserId, ClientError> {
        let credential = self
            .sign_in
            .execute(method)
            .await
            .map_err(|e| ClientError::AuthFailed(e.to_string()))?;
        *self.remembered.lock().await = Some(credential.session_token);
        self.user.send_replace(Some(credential.user_id.clone()));
        Ok(credential.user_id)
    }
}

#[async_trait]
impl IdentityClient for LocalIdentity {
    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.user.subscribe()
    }

    async fn sign_in_anonymously(&self) -> Result<UserId, ClientError> {
        self.sign_in(SignInMethod::Anonymous).await
    }

    async fn sign_in_with_custom_token(&self, token: &str) -> Result<UserId, ClientError> {
        self.sign_in(SignInMethod::CustomToken(token.to_string()))
            .await
    }
}

struct LocalStore {
    documents: Arc<dyn DocumentRepository>,
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn create(
        &self,
        path: &CollectionPath,
        author: &UserId,
        fields: RecordFields,
    ) -> Result<RecordId, ClientError> {
        let record = AppendRecordUseCase::new(self.documents.clone())
            .execute(path.clone(), author.clone(), fields)
            .await
            .map_err(|e| ClientError::RemoteWriteFailed(e.to_string()))?;
        Ok(record.id)
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &RecordId,
    ) -> Result<Option<Record>, ClientError> {
        match GetRecordUseCase::new(self.documents.clone())
            .execute(path, id)
            .await
        {
            Ok(record) => Ok(Some(record)),
            Err(ReadRecordError::NotFound(_)) => Ok(None),
            Err(e) => Err(ClientError::RemoteReadFailed(e.to_string())),
        }
    }

    async fn delete(
        &self,
        path: &CollectionPath,
        id: &RecordId,
        caller: &UserId,
    ) -> Result<(), ClientError> {
        RemoveRecordUseCase::new(self.documents.clone())
            .execute(path, id, caller)
            .await
            .map_err(|e| match e {
                RemoveRecordError::Forbidden => ClientError::Forbidden,
                other => ClientError::RemoteWriteFailed(other.to_string()),
            })
    }

    fn watch(&self, path: &CollectionPath) -> SnapshotStream {
        let list = ListRecordsUseCase::new(self.documents.clone());
        let initial: Option<broadcast::Receiver<CollectionPath>> = None;

        stream::unfold(
            (list, path.clone(), initial),
            |(list, path, changes)| async move {
                let changes = match changes {
                    // Subscribe before the first read so no change slips between them.
                    None => list.changes(),
                    Some(mut changes) => {
                        loop {
                            match changes.recv().await {
                                Ok(changed) if changed == path => break,
                                Ok(_) => continue,
                                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                    tracing::debug!("Watch on {} lagged by {}", path, skipped);
                                    break;
                                }
                                Err(broadcast::error::RecvError::Closed) => return None,
                            }
                        }
                        changes
                    }
                };
                let snapshot = list
                    .execute(&path)
                    .await
                    .map_err(|e| ClientError::RemoteReadFailed(e.to_string()));
                Some((snapshot, (list, path, Some(changes))))
            },
        )
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StoreConfig {
        StoreConfig {
            endpoint: "memory://test".to_string(),
            ..Default::default()
        }
    }

    fn path() -> CollectionPath {
        CollectionPath::from_segments("coach-site", "messages").unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_publishes_identity() {
        // テスト項目: サインインすると購読中の identity が更新される
        // given (前提条件):
        let connection = LocalBackend::in_memory().connect(&config()).await.unwrap();
        let mut users = connection.identity.subscribe();
        assert_eq!(*users.borrow(), None);

        // when (操作):
        let uid = connection.identity.sign_in_anonymously().await.unwrap();

        // then (期待する結果):
        users.changed().await.unwrap();
        assert_eq!(users.borrow().clone(), Some(uid));
    }

    #[tokio::test]
    async fn test_reconnect_restores_previous_session() {
        // テスト項目: 再接続すると前回のセッションが復元される
        // given (前提条件):
        let backend = LocalBackend::in_memory();
        let first = backend.connect(&config()).await.unwrap();
        let uid = first.identity.sign_in_anonymously().await.unwrap();

        // when (操作):
        let second = backend.connect(&config()).await.unwrap();

        // then (期待する結果):
        assert_eq!(second.identity.subscribe().borrow().clone(), Some(uid));
    }

    #[tokio::test]
    async fn test_unknown_custom_token_is_auth_failure() {
        // テスト項目: 未発行のカスタムトークンは AuthFailed になる
        // given (前提条件):
        let connection = LocalBackend::in_memory().connect(&config()).await.unwrap();

        // when (操作):
        let result = connection
            .identity
            .sign_in_with_custom_token("forged")
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::AuthFailed(_))));
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_forbidden() {
        // テスト項目: 他人のレコード削除はストア側で拒否される
        // given (前提条件):
        let connection = LocalBackend::in_memory().connect(&config()).await.unwrap();
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();
        let id = connection
            .store
            .create(&path(), &alice, RecordFields::text("hi").unwrap())
            .await
            .unwrap();

        // when (操作):
        let result = connection.store.delete(&path(), &id, &bob).await;

        // then (期待する結果):
        assert_eq!(result, Err(ClientError::Forbidden));
        assert!(connection.store.get(&path(), &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_watch_emits_snapshot_per_change() {
        // テスト項目: 監視ストリームは初回と変更ごとに全件スナップショットを流す
        // given (前提条件):
        let connection = LocalBackend::in_memory().connect(&config()).await.unwrap();
        let alice = UserId::new("alice".to_string()).unwrap();
        let mut snapshots = connection.store.watch(&path());

        // when (操作):
        let initial = snapshots.next().await.unwrap().unwrap();
        connection
            .store
            .create(&path(), &alice, RecordFields::text("one").unwrap())
            .await
            .unwrap();
        let after = snapshots.next().await.unwrap().unwrap();

        // then (期待する結果):
        assert!(initial.is_empty());
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].text(), Some("one"));
    }
}
