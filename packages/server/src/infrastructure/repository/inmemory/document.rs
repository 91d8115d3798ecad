//! InMemory Document Repository 実装
//!
//! ドメイン層が定義する DocumentRepository trait の具体的な実装。
//! コレクションパスごとの HashMap をインメモリ DB として使用します。
//!
//! 変更通知は `tokio::sync::broadcast` で配信します。購読者が一人もいない場合、
//! 通知は単に捨てられます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};

use crate::domain::{CollectionPath, DocumentRepository, Record, RecordId, RepositoryError};

/// Capacity of the change feed; slow watchers that fall further behind get `Lagged`.
pub const CHANGE_FEED_CAPACITY: usize = 256;

type Collections = HashMap<CollectionPath, HashMap<RecordId, Record>>;

/// インメモリ Document Repository 実装
pub struct InMemoryDocumentRepository {
    /// コレクションパス → (RecordId → Record)
    collections: Arc<Mutex<Collections>>,
    /// 変更されたコレクションパスの通知チャンネル
    changes: broadcast::Sender<CollectionPath>,
}

impl InMemoryDocumentRepository {
    /// 新しい InMemoryDocumentRepository を作成
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            collections: Arc::new(Mutex::new(HashMap::new())),
            changes,
        }
    }

    fn notify(&self, path: &CollectionPath) {
        // No receivers is not an error for a store nobody watches.
        if self.changes.send(path.clone()).is_err() {
            tracing::trace!("No watchers for {}", path);
        }
    }
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(&self, record: Record) -> Result<(), RepositoryError> {
        let path = record.path.clone();
        {
            let mut collections = self.collections.lock().await;
            let collection = collections.entry(path.clone()).or_default();
            if collection.contains_key(&record.id) {
                return Err(RepositoryError::RecordAlreadyExists(
                    record.id.as_str().to_string(),
                ));
            }
            collection.insert(record.id.clone(), record);
        }
        self.notify(&path);
        Ok(())
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &RecordId,
    ) -> Result<Option<Record>, RepositoryError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(path)
            .and_then(|collection| collection.get(id))
            .cloned())
    }

    async fn delete(&self, path: &CollectionPath, id: &RecordId) -> Result<(), RepositoryError> {
        {
            let mut collections = self.collections.lock().await;
            collections
                .get_mut(path)
                .and_then(|collection| collection.remove(id))
                .ok_or_else(|| RepositoryError::RecordNotFound(id.as_str().to_string()))?;
        }
        self.notify(path);
        Ok(())
    }

    async fn list(&self, path: &CollectionPath) -> Result<Vec<Record>, RepositoryError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(path)
            .map(|collection| collection.values().cloned().collect())
            .unwrap_or_default())
    }

    fn subscribe(&self) -> broadcast::Receiver<CollectionPath> {
        self.changes.subscribe()
    }
}
