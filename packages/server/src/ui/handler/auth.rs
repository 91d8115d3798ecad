//! Bearer-token authentication helpers.

use axum::http::{HeaderMap, header::AUTHORIZATION};

use crate::{domain::UserId, ui::state::AppState, usecase::ResolveSessionUseCase};

use super::ApiError;

/// Extract the token of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolve the calling user from a raw session token
pub async fn authenticate(state: &AppState, token: Option<&str>) -> Result<UserId, ApiError> {
    let usecase = ResolveSessionUseCase::new(state.identity.clone());
    Ok(usecase.execute(token).await?)
}
