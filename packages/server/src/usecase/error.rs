//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{IdentityError, RepositoryError};

/// サインイン失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignInError {
    /// Custom token unknown or already redeemed
    #[error("Custom token rejected: {0}")]
    TokenRejected(String),

    #[error("Identity service failure: {0}")]
    Backend(String),
}

impl From<IdentityError> for SignInError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::UnknownCustomToken | IdentityError::CustomTokenAlreadyUsed => {
                SignInError::TokenRejected(err.to_string())
            }
            IdentityError::InvalidSession | IdentityError::Backend(_) => {
                SignInError::Backend(err.to_string())
            }
        }
    }
}

/// セッション解決の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is missing or invalid")]
    Unauthenticated,

    #[error("Identity service failure: {0}")]
    Backend(String),
}

impl From<IdentityError> for SessionError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Backend(msg) => SessionError::Backend(msg),
            _ => SessionError::Unauthenticated,
        }
    }
}

/// レコード追加の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppendRecordError {
    #[error("Failed to store record: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AppendRecordError {
    fn from(err: RepositoryError) -> Self {
        AppendRecordError::Storage(err.to_string())
    }
}

/// レコード読み取りの失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadRecordError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Failed to read records: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ReadRecordError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RecordNotFound(id) => ReadRecordError::NotFound(id),
            other => ReadRecordError::Storage(other.to_string()),
        }
    }
}

/// レコード削除の失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoveRecordError {
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Caller is not the record's author
    #[error("Only the author can delete this record")]
    Forbidden,

    #[error("Failed to delete record: {0}")]
    Storage(String),
}

impl From<RepositoryError> for RemoveRecordError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RecordNotFound(id) => RemoveRecordError::NotFound(id),
            other => RemoveRecordError::Storage(other.to_string()),
        }
    }
}
