//! UseCase: レコード追加処理
//!
//! 作成者 ID とサーバー側タイムスタンプをレコードに付与して保存します。
//! 呼び出し側がフィールドに紛れ込ませた authorId は RecordFields の段階で取り除かれています。

use std::sync::Arc;

use coachdesk_shared::time::get_utc_timestamp;

use crate::domain::{
    CollectionPath, DocumentRepository, Record, RecordFields, RecordIdFactory, Timestamp, UserId,
};

use super::error::AppendRecordError;

/// レコード追加のユースケース
pub struct AppendRecordUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn DocumentRepository>,
}

impl AppendRecordUseCase {
    /// 新しい AppendRecordUseCase を作成
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    /// レコード追加を実行
    ///
    /// # Arguments
    ///
    /// * `path` - 保存先コレクション
    /// * `author` - 認証済みの呼び出し元
    /// * `fields` - レコード本文
    ///
    /// # Returns
    ///
    /// * `Ok(Record)` - 保存されたレコード（ID とタイムスタンプ付き）
    /// * `Err(AppendRecordError)` - 保存失敗
    pub async fn execute(
        &self,
        path: CollectionPath,
        author: UserId,
        fields: RecordFields,
    ) -> Result<Record, AppendRecordError> {
        let id = RecordIdFactory::generate()
            .map_err(|e| AppendRecordError::Storage(e.to_string()))?;
        let record = Record::new(
            id,
            path,
            author,
            fields,
            Timestamp::new(get_utc_timestamp()),
        );

        self.repository.insert(record.clone()).await?;
        tracing::debug!(
            "Stored record '{}' in {} for '{}'",
            record.id,
            record.path,
            record.author_id
        );
        Ok(record)
    }
}
