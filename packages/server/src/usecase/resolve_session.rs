//! UseCase: セッショントークンからユーザーを解決

use std::sync::Arc;

use crate::domain::{IdentityRepository, SessionToken, UserId};

use super::error::SessionError;

/// セッション解決のユースケース
pub struct ResolveSessionUseCase {
    identity: Arc<dyn IdentityRepository>,
}

impl ResolveSessionUseCase {
    pub fn new(identity: Arc<dyn IdentityRepository>) -> Self {
        Self { identity }
    }

    /// Resolve a raw bearer token; a missing or malformed token is `Unauthenticated`.
    pub async fn execute(&self, raw_token: Option<&str>) -> Result<UserId, SessionError> {
        let token = raw_token
            .map(|t| SessionToken::new(t.to_string()))
            .transpose()
            .map_err(|_| SessionError::Unauthenticated)?
            .ok_or(SessionError::Unauthenticated)?;
        Ok(self.identity.resolve_session(&token).await?)
    }
}
