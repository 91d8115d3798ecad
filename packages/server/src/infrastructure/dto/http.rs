//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    CollectionPath, Credential, Record, RecordFields, RecordId, Timestamp, UserId,
    ValueObjectError,
};

/// Response of both sign-in endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponseDto {
    pub uid: String,
    pub session_token: String,
    pub anonymous: bool,
}

impl From<Credential> for SignInResponseDto {
    fn from(credential: Credential) -> Self {
        Self {
            uid: credential.user_id.into_string(),
            session_token: credential.session_token.into(),
            anonymous: credential.anonymous,
        }
    }
}

/// Body of `POST /api/auth/custom-token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomTokenRequestDto {
    pub token: String,
}

/// Response of `GET /api/auth/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    pub uid: String,
}

/// Body of a record creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecordRequestDto {
    pub fields: Value,
}

/// Response of a record creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecordResponseDto {
    pub id: String,
}

/// Wire form of a stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    pub id: String,
    pub path: String,
    pub author_id: String,
    pub fields: Map<String, Value>,
    /// Unix timestamp (milliseconds since epoch), UTC
    pub created_at: i64,
}

impl From<&Record> for RecordDto {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.as_str().to_string(),
            path: record.path.to_string(),
            author_id: record.author_id.as_str().to_string(),
            fields: record.fields.as_map().clone(),
            created_at: record.created_at.value(),
        }
    }
}

impl TryFrom<RecordDto> for Record {
    type Error = ValueObjectError;

    fn try_from(dto: RecordDto) -> Result<Self, Self::Error> {
        Ok(Record::new(
            RecordId::new(dto.id)?,
            dto.path.parse::<CollectionPath>()?,
            UserId::new(dto.author_id)?,
            RecordFields::new(dto.fields)?,
            Timestamp::new(dto.created_at),
        ))
    }
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
}
