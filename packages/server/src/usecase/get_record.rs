//! UseCase: レコード単体取得

use std::sync::Arc;

use crate::domain::{CollectionPath, DocumentRepository, Record, RecordId};

use super::error::ReadRecordError;

/// レコード取得のユースケース
pub struct GetRecordUseCase {
    repository: Arc<dyn DocumentRepository>,
}

impl GetRecordUseCase {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    /// Fetch one record; a missing record is `NotFound`.
    pub async fn execute(
        &self,
        path: &CollectionPath,
        id: &RecordId,
    ) -> Result<Record, ReadRecordError> {
        self.repository
            .get(path, id)
            .await?
            .ok_or_else(|| ReadRecordError::NotFound(id.as_str().to_string()))
    }
}
