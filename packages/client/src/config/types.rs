//! Site configuration types.

use coachdesk_server::domain::AppId;
use serde::{Deserialize, Serialize};

/// Default generative-language API base URL
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generative-language model
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";

fn default_chat_endpoint() -> String {
    DEFAULT_CHAT_ENDPOINT.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

/// Connection parameters for the document store and identity service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Base URL of the backend, e.g. `http://127.0.0.1:8080`
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
}

/// Generative-language endpoint used by the chat widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    pub api_key: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
}

impl ChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_chat_model(),
            endpoint: default_chat_endpoint(),
        }
    }
}

/// Everything the site needs to start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default, rename = "storeConfig")]
    pub store: StoreConfig,
    /// Namespace under which all documents live
    #[serde(default)]
    pub app_id: String,
    /// One-time custom token used instead of anonymous sign-in
    #[serde(default)]
    pub initial_auth_token: Option<String>,
    #[serde(default)]
    pub chat: Option<ChatConfig>,
}

impl SiteConfig {
    /// The namespace, when `app_id` is a valid application id
    pub fn namespace(&self) -> Option<AppId> {
        AppId::new(self.app_id.clone()).ok()
    }

    /// Structurally usable: a store endpoint and a valid namespace
    pub fn is_valid(&self) -> bool {
        !self.store.endpoint.trim().is_empty() && self.namespace().is_some()
    }

    /// The initial auth token, ignoring blank values
    pub fn auth_token(&self) -> Option<&str> {
        self.initial_auth_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_invalid() {
        // テスト項目: 空の設定は無効と判定される
        // then (期待する結果):
        assert!(!SiteConfig::default().is_valid());
    }

    #[test]
    fn test_parse_host_shape() {
        // テスト項目: ホスト注入形式の JSON を読み込める（chat の既定値も補われる）
        // given (前提条件):
        let raw = r#"{
            "storeConfig": {"endpoint": "http://127.0.0.1:8080", "apiKey": "k", "projectId": "p"},
            "appId": "coach-site",
            "initialAuthToken": "  ",
            "chat": {"apiKey": "g"}
        }"#;

        // when (操作):
        let config: SiteConfig = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert!(config.is_valid());
        assert_eq!(config.namespace().unwrap().as_str(), "coach-site");
        assert_eq!(config.auth_token(), None);
        let chat = config.chat.unwrap();
        assert_eq!(chat.model, DEFAULT_CHAT_MODEL);
        assert_eq!(chat.endpoint, DEFAULT_CHAT_ENDPOINT);
    }

    #[test]
    fn test_invalid_app_id_makes_config_invalid() {
        // テスト項目: 不正なアプリ ID を含む設定は無効になる
        // given (前提条件):
        let config = SiteConfig {
            store: StoreConfig {
                endpoint: "http://localhost".to_string(),
                ..Default::default()
            },
            app_id: "has space".to_string(),
            ..Default::default()
        };

        // then (期待する結果):
        assert!(!config.is_valid());
    }
}
