//! Domain factories for creating identifiers.

use super::{
    error::ValueObjectError,
    value_object::{RecordId, SessionToken, UserId},
};

/// Factory for generating RecordId instances.
///
/// This factory encapsulates the logic for generating new record identifiers,
/// separating the generation concern from the validation logic in RecordId.
pub struct RecordIdFactory;

impl RecordIdFactory {
    /// Generate a new RecordId from a random UUID v4 (simple form, no hyphens).
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<RecordId, ValueObjectError> {
        RecordId::new(uuid::Uuid::new_v4().simple().to_string())
    }
}

/// Factory for generating UserId instances for new users.
pub struct UserIdFactory;

impl UserIdFactory {
    /// Generate a new UserId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// Never fails in practice, see [`RecordIdFactory::generate`].
    pub fn generate() -> Result<UserId, ValueObjectError> {
        UserId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Factory for generating SessionToken instances.
pub struct SessionTokenFactory;

impl SessionTokenFactory {
    /// Generate a new opaque session token (two UUID v4 values concatenated).
    ///
    /// # Errors
    ///
    /// Never fails in practice, see [`RecordIdFactory::generate`].
    pub fn generate() -> Result<SessionToken, ValueObjectError> {
        let token = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        SessionToken::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_factory_generate() {
        // テスト項目: RecordIdFactory::generate() でハイフンなし UUID 形式の RecordId を生成できる
        // when (操作):
        let record_id = RecordIdFactory::generate().unwrap();

        // then (期待する結果):
        assert_eq!(record_id.as_str().len(), 32);
        assert!(!record_id.as_str().contains('-'));
    }

    #[test]
    fn test_record_id_factory_generate_uniqueness() {
        // テスト項目: RecordIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let id1 = RecordIdFactory::generate().unwrap();
        let id2 = RecordIdFactory::generate().unwrap();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_user_id_factory_generate() {
        // テスト項目: UserIdFactory::generate() で UUID v4 形式の UserId を生成できる
        // when (操作):
        let user_id = UserIdFactory::generate().unwrap();

        // then (期待する結果):
        assert_eq!(user_id.as_str().len(), 36); // UUID v4 の標準長（ハイフン含む）
    }

    #[test]
    fn test_session_token_factory_generate() {
        // テスト項目: セッショントークンは 64 文字で毎回異なる
        // when (操作):
        let t1 = SessionTokenFactory::generate().unwrap();
        let t2 = SessionTokenFactory::generate().unwrap();

        // then (期待する結果):
        assert_eq!(t1.as_str().len(), 64);
        assert_ne!(t1, t2);
    }
}
