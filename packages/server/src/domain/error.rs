//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    #[error("AppId cannot be empty")]
    AppIdEmpty,

    /// AppId must be a single path segment of `[A-Za-z0-9_-]`
    #[error("AppId must be a short path segment of letters, digits, '-' or '_' (got: {0})")]
    AppIdInvalid(String),

    #[error("CollectionName cannot be empty")]
    CollectionNameEmpty,

    #[error("CollectionName must be a short path segment of letters, digits, '-' or '_' (got: {0})")]
    CollectionNameInvalid(String),

    /// Collection path does not follow `artifacts/{appId}/public/data/{collection}`
    #[error("Invalid collection path: {0}")]
    CollectionPathInvalid(String),

    #[error("RecordId cannot be empty")]
    RecordIdEmpty,

    #[error("RecordId cannot exceed {max} characters (got {actual})")]
    RecordIdTooLong { max: usize, actual: usize },

    #[error("RecordId may only contain letters, digits, '-' or '_' (got: {0})")]
    RecordIdInvalid(String),

    /// No user fields left after stripping reserved keys
    #[error("Record fields cannot be empty")]
    RecordFieldsEmpty,

    #[error("Record fields must be a JSON object")]
    RecordFieldsNotObject,

    #[error("Record fields cannot exceed {max} bytes (got {actual})")]
    RecordFieldsTooLarge { max: usize, actual: usize },

    #[error("SessionToken cannot be empty")]
    SessionTokenEmpty,
}

/// Errors raised by document repositories
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The record does not exist in the collection
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A record with the same id already exists
    #[error("Record already exists: {0}")]
    RecordAlreadyExists(String),

    /// Backend storage failure
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Errors raised by the identity service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The custom token was never issued
    #[error("Custom token is not recognized")]
    UnknownCustomToken,

    /// The custom token was already redeemed once
    #[error("Custom token has already been used")]
    CustomTokenAlreadyUsed,

    /// The session token does not belong to a live session
    #[error("Session is invalid or expired")]
    InvalidSession,

    /// Identity backend failure
    #[error("Identity service failure: {0}")]
    Backend(String),
}
