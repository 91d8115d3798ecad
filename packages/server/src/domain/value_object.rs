//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a user identifier
pub const USER_ID_MAX_LEN: usize = 128;

/// Maximum length of an application id or collection name
pub const SEGMENT_MAX_LEN: usize = 64;

/// Maximum length of a record identifier
pub const RECORD_ID_MAX_LEN: usize = 128;

/// Maximum serialized size of record fields in bytes
pub const RECORD_FIELDS_MAX_BYTES: usize = 16 * 1024;

/// Field keys stamped by the store; callers cannot set them.
pub const RESERVED_FIELD_KEYS: [&str; 3] = ["id", "authorId", "createdAt"];

/// User identifier value object.
///
/// Issued by the identity service; every record carries its author's `UserId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or longer than [`USER_ID_MAX_LEN`]
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        let len = id.chars().count();
        if len > USER_ID_MAX_LEN {
            return Err(ValueObjectError::UserIdTooLong {
                max: USER_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form used when showing other people's ids (first 8 characters).
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_path_segment(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Application identifier value object.
///
/// The namespace under which one deployment stores all of its documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    /// Create a new AppId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, too long, or not a single path segment
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::AppIdEmpty);
        }
        if id.len() > SEGMENT_MAX_LEN || !is_path_segment(&id) {
            return Err(ValueObjectError::AppIdInvalid(id));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AppId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for String {
    fn from(value: AppId) -> Self {
        value.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collection name value object (e.g. `messages`, `contacts`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new CollectionName.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or not a single path segment
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::CollectionNameEmpty);
        }
        if name.len() > SEGMENT_MAX_LEN || !is_path_segment(&name) {
            return Err(ValueObjectError::CollectionNameInvalid(name));
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CollectionName> for String {
    fn from(value: CollectionName) -> Self {
        value.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record identifier value object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a new RecordId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, longer than [`RECORD_ID_MAX_LEN`],
    /// or not a single path segment
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RecordIdEmpty);
        }
        let len = id.len();
        if len > RECORD_ID_MAX_LEN {
            return Err(ValueObjectError::RecordIdTooLong {
                max: RECORD_ID_MAX_LEN,
                actual: len,
            });
        }
        if !is_path_segment(&id) {
            return Err(ValueObjectError::RecordIdInvalid(id));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller supplied document body.
///
/// A JSON object with the reserved keys removed. Whatever author or timestamp
/// the caller tries to smuggle in is dropped here; the store stamps its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RecordFields(Map<String, Value>);

impl RecordFields {
    /// Create a new RecordFields from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is left after stripping reserved keys, or the
    /// serialized object exceeds [`RECORD_FIELDS_MAX_BYTES`]
    pub fn new(mut fields: Map<String, Value>) -> Result<Self, ValueObjectError> {
        for key in RESERVED_FIELD_KEYS {
            fields.remove(key);
        }
        if fields.is_empty() {
            return Err(ValueObjectError::RecordFieldsEmpty);
        }
        let size = Value::Object(fields.clone()).to_string().len();
        if size > RECORD_FIELDS_MAX_BYTES {
            return Err(ValueObjectError::RecordFieldsTooLarge {
                max: RECORD_FIELDS_MAX_BYTES,
                actual: size,
            });
        }
        Ok(Self(fields))
    }

    /// Build fields from any JSON value; only objects are accepted.
    ///
    /// # Errors
    ///
    /// Returns `RecordFieldsNotObject` for non-object values
    pub fn from_value(value: Value) -> Result<Self, ValueObjectError> {
        match value {
            Value::Object(map) => Self::new(map),
            _ => Err(ValueObjectError::RecordFieldsNotObject),
        }
    }

    /// Single `text` field, the shape chat messages use.
    ///
    /// # Errors
    ///
    /// Returns `RecordFieldsEmpty` for blank text
    pub fn text(text: impl Into<String>) -> Result<Self, ValueObjectError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValueObjectError::RecordFieldsEmpty);
        }
        let mut map = Map::new();
        map.insert("text".to_string(), Value::String(text));
        Self::new(map)
    }

    /// Look up a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into the underlying JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl TryFrom<Map<String, Value>> for RecordFields {
    type Error = ValueObjectError;

    fn try_from(value: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordFields> for Map<String, Value> {
    fn from(value: RecordFields) -> Self {
        value.0
    }
}

/// Opaque session token handed out by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new SessionToken.
    ///
    /// # Errors
    ///
    /// Returns `SessionTokenEmpty` for an empty token
    pub fn new(token: String) -> Result<Self, ValueObjectError> {
        if token.trim().is_empty() {
            return Err(ValueObjectError::SessionTokenEmpty);
        }
        Ok(Self(token))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionToken {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_new_success() {
        // テスト項目: 有効なユーザー ID を作成できる
        // when (操作):
        let result = UserId::new("u-123".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "u-123");
    }

    #[test]
    fn test_user_id_new_empty_fails() {
        // テスト項目: 空のユーザー ID は作成できない
        // when (操作):
        let result = UserId::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::UserIdEmpty);
    }

    #[test]
    fn test_user_id_new_too_long_fails() {
        // テスト項目: 129 文字以上のユーザー ID は作成できない
        // when (操作):
        let result = UserId::new("a".repeat(129));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::UserIdTooLong {
                max: 128,
                actual: 129
            }
        );
    }

    #[test]
    fn test_user_id_short() {
        // テスト項目: 他人の ID 表示用に先頭 8 文字を取り出せる
        // given (前提条件):
        let long = UserId::new("0123456789abcdef".to_string()).unwrap();
        let short = UserId::new("abc".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(long.short(), "01234567");
        assert_eq!(short.short(), "abc");
    }

    #[test]
    fn test_app_id_rejects_path_separators() {
        // テスト項目: スラッシュを含むアプリ ID は拒否される
        // when (操作):
        let result = AppId::new("site/../other".to_string());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::AppIdInvalid("site/../other".to_string())
        );
    }

    #[test]
    fn test_record_id_rejects_url_characters() {
        // テスト項目: URL の区切り文字を含むレコード ID は拒否される
        // when (操作):
        let slash = RecordId::new("r1/../r2".to_string());
        let query = RecordId::new("r1?x=1".to_string());
        let generated = RecordId::new("3f2b9c1e-8a4d-4e6f-9b0a-1c2d3e4f5a6b".to_string());

        // then (期待する結果):
        assert_eq!(
            slash.unwrap_err(),
            ValueObjectError::RecordIdInvalid("r1/../r2".to_string())
        );
        assert_eq!(
            query.unwrap_err(),
            ValueObjectError::RecordIdInvalid("r1?x=1".to_string())
        );
        assert!(generated.is_ok());
    }

    #[test]
    fn test_collection_name_new_success() {
        // テスト項目: 有効なコレクション名を作成できる
        // when (操作):
        let result = CollectionName::new("contact_submissions".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "contact_submissions");
    }

    #[test]
    fn test_collection_name_empty_fails() {
        // テスト項目: 空のコレクション名は作成できない
        // when (操作):
        let result = CollectionName::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::CollectionNameEmpty);
    }

    #[test]
    fn test_record_fields_strip_reserved_keys() {
        // テスト項目: 予約キー（authorId など）は呼び出し側の値が取り除かれる
        // given (前提条件):
        let value = json!({"text": "hi", "authorId": "someone-else", "createdAt": 1, "id": "x"});

        // when (操作):
        let fields = RecordFields::from_value(value).unwrap();

        // then (期待する結果):
        assert_eq!(fields.as_map().len(), 1);
        assert_eq!(fields.get_str("text"), Some("hi"));
    }

    #[test]
    fn test_record_fields_only_reserved_keys_fails() {
        // テスト項目: 予約キーしかないフィールドは空として扱われる
        // when (操作):
        let result = RecordFields::from_value(json!({"authorId": "u1"}));

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::RecordFieldsEmpty);
    }

    #[test]
    fn test_record_fields_non_object_fails() {
        // テスト項目: オブジェクト以外の JSON は拒否される
        // when (操作):
        let result = RecordFields::from_value(json!(["hi"]));

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::RecordFieldsNotObject);
    }

    #[test]
    fn test_record_fields_too_large_fails() {
        // テスト項目: 16 KiB を超えるフィールドは拒否される
        // when (操作):
        let result = RecordFields::text("a".repeat(RECORD_FIELDS_MAX_BYTES));

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            ValueObjectError::RecordFieldsTooLarge { .. }
        ));
    }

    #[test]
    fn test_record_fields_blank_text_fails() {
        // テスト項目: 空白だけのテキストはメッセージにできない
        // when (操作):
        let result = RecordFields::text("   ");

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::RecordFieldsEmpty);
    }

    #[test]
    fn test_user_id_deserialize_validates() {
        // テスト項目: デシリアライズ時にも検証が行われる
        // when (操作):
        let ok: Result<UserId, _> = serde_json::from_str("\"u1\"");
        let empty: Result<UserId, _> = serde_json::from_str("\"\"");

        // then (期待する結果):
        assert_eq!(ok.unwrap().as_str(), "u1");
        assert!(empty.is_err());
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert!(ts2 > ts1);
    }
}
