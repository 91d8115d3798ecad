//! UseCase: サインイン処理
//!
//! 匿名サインインと、一度きりのカスタムトークンによるサインインを扱います。

use std::sync::Arc;

use crate::domain::{Credential, IdentityRepository};

use super::error::SignInError;

/// How the caller wants to acquire an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInMethod {
    Anonymous,
    CustomToken(String),
}

/// サインインのユースケース
pub struct SignInUseCase {
    identity: Arc<dyn IdentityRepository>,
}

impl SignInUseCase {
    /// 新しい SignInUseCase を作成
    pub fn new(identity: Arc<dyn IdentityRepository>) -> Self {
        Self { identity }
    }

    /// サインインを実行
    ///
    /// # Returns
    ///
    /// * `Ok(Credential)` - 新しいセッション
    /// * `Err(SignInError)` - トークン拒否またはバックエンド障害
    pub async fn execute(&self, method: SignInMethod) -> Result<Credential, SignInError> {
        let credential = match method {
            SignInMethod::Anonymous => self.identity.create_anonymous().await?,
            SignInMethod::CustomToken(token) => {
                self.identity.redeem_custom_token(&token).await?
            }
        };
        tracing::info!(
            "Signed in user '{}' (anonymous: {})",
            credential.user_id,
            credential.anonymous
        );
        Ok(credential)
    }
}
