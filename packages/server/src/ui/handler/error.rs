//! Mapping of use-case errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::ValueObjectError,
    infrastructure::dto::http::ErrorResponseDto,
    usecase::{AppendRecordError, ReadRecordError, RemoveRecordError, SessionError, SignInError},
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponseDto {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(err: ValueObjectError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<SignInError> for ApiError {
    fn from(err: SignInError) -> Self {
        match err {
            SignInError::TokenRejected(_) => ApiError::Unauthorized(err.to_string()),
            SignInError::Backend(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthenticated => ApiError::Unauthorized(err.to_string()),
            SessionError::Backend(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AppendRecordError> for ApiError {
    fn from(err: AppendRecordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ReadRecordError> for ApiError {
    fn from(err: ReadRecordError) -> Self {
        match err {
            ReadRecordError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ReadRecordError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<RemoveRecordError> for ApiError {
    fn from(err: RemoveRecordError) -> Self {
        match err {
            RemoveRecordError::NotFound(_) => ApiError::NotFound(err.to_string()),
            RemoveRecordError::Forbidden => ApiError::Forbidden(err.to_string()),
            RemoveRecordError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}
