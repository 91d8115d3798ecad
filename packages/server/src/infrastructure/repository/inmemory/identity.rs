//! InMemory Identity Repository 実装
//!
//! 匿名ユーザーの発行、一度きりのカスタムトークンの引き換え、
//! セッショントークンからユーザーへの解決を行います。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Credential, IdentityError, IdentityRepository, SessionToken, SessionTokenFactory, UserId,
    UserIdFactory, ValueObjectError,
};

/// State of an issued custom token
#[derive(Debug, Clone)]
struct CustomTokenGrant {
    user_id: UserId,
    redeemed: bool,
}

/// インメモリ Identity Repository 実装
pub struct InMemoryIdentityRepository {
    /// カスタムトークン → 付与先ユーザー
    custom_tokens: Mutex<HashMap<String, CustomTokenGrant>>,
    /// セッショントークン → ユーザー
    sessions: Mutex<HashMap<SessionToken, UserId>>,
}

impl InMemoryIdentityRepository {
    /// 新しい InMemoryIdentityRepository を作成
    pub fn new() -> Self {
        Self {
            custom_tokens: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a repository with pre-issued custom tokens
    pub fn with_custom_tokens(tokens: impl IntoIterator<Item = (String, UserId)>) -> Self {
        let custom_tokens = tokens
            .into_iter()
            .map(|(token, user_id)| {
                (
                    token,
                    CustomTokenGrant {
                        user_id,
                        redeemed: false,
                    },
                )
            })
            .collect();
        Self {
            custom_tokens: Mutex::new(custom_tokens),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a one-time custom token for `user_id`
    pub async fn issue_custom_token(&self, token: String, user_id: UserId) {
        let mut tokens = self.custom_tokens.lock().await;
        tokens.insert(
            token,
            CustomTokenGrant {
                user_id,
                redeemed: false,
            },
        );
    }

    async fn open_session(&self, user_id: UserId, anonymous: bool) -> Result<Credential, IdentityError> {
        let session_token = SessionTokenFactory::generate().map_err(backend_error)?;
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session_token.clone(), user_id.clone());
        Ok(Credential::new(user_id, session_token, anonymous))
    }
}

impl Default for InMemoryIdentityRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn backend_error(err: ValueObjectError) -> IdentityError {
    IdentityError::Backend(err.to_string())
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create_anonymous(&self) -> Result<Credential, IdentityError> {
        let user_id = UserIdFactory::generate().map_err(backend_error)?;
        self.open_session(user_id, true).await
    }

    async fn redeem_custom_token(&self, token: &str) -> Result<Credential, IdentityError> {
        let user_id = {
            let mut tokens = self.custom_tokens.lock().await;
            let grant = tokens
                .get_mut(token)
                .ok_or(IdentityError::UnknownCustomToken)?;
            if grant.redeemed {
                return Err(IdentityError::CustomTokenAlreadyUsed);
            }
            grant.redeemed = true;
            grant.user_id.clone()
        };
        self.open_session(user_id, false).await
    }

    async fn resolve_session(&self, token: &SessionToken) -> Result<UserId, IdentityError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(token)
            .cloned()
            .ok_or(IdentityError::InvalidSession)
    }
}
