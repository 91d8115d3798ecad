//! UseCase: レコード削除処理
//!
//! 削除は作成者本人にのみ許可します。所有者チェックはストア側で強制され、
//! クライアント側のチェックは補助的なものに過ぎません。
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成者による削除
//! - 異常系：他人のレコードの削除（Forbidden、変更なし）
//! - 異常系：存在しないレコード

use std::sync::Arc;

use crate::domain::{CollectionPath, DocumentRepository, RecordId, UserId};

use super::error::RemoveRecordError;

/// レコード削除のユースケース
pub struct RemoveRecordUseCase {
    repository: Arc<dyn DocumentRepository>,
}

impl RemoveRecordUseCase {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    /// レコード削除を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 削除成功
    /// * `Err(RemoveRecordError::Forbidden)` - 呼び出し元が作成者ではない（何も変更しない）
    /// * `Err(RemoveRecordError::NotFound)` - レコードが存在しない
    pub async fn execute(
        &self,
        path: &CollectionPath,
        id: &RecordId,
        caller: &UserId,
    ) -> Result<(), RemoveRecordError> {
        let record = self
            .repository
            .get(path, id)
            .await?
            .ok_or_else(|| RemoveRecordError::NotFound(id.as_str().to_string()))?;

        if !record.is_owned_by(caller) {
            tracing::warn!(
                "User '{}' tried to delete record '{}' owned by '{}'",
                caller,
                id,
                record.author_id
            );
            return Err(RemoveRecordError::Forbidden);
        }

        self.repository.delete(path, id).await?;
        tracing::debug!("Deleted record '{}' from {}", id, path);
        Ok(())
    }
}
