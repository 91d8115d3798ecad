//! UseCase: コレクション一覧取得
//!
//! ライブ購読（WebSocket）でも変更通知のたびにこのユースケースで全件を読み直します。

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::{CollectionPath, DocumentRepository, Record};

use super::error::ReadRecordError;

/// 一覧取得のユースケース
pub struct ListRecordsUseCase {
    repository: Arc<dyn DocumentRepository>,
}

impl ListRecordsUseCase {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    /// Full current contents of `path`, in no particular order.
    pub async fn execute(&self, path: &CollectionPath) -> Result<Vec<Record>, ReadRecordError> {
        Ok(self.repository.list(path).await?)
    }

    /// Change feed to pair with [`Self::execute`] for live watches.
    pub fn changes(&self) -> broadcast::Receiver<CollectionPath> {
        self.repository.subscribe()
    }
}
