//! Backend talking to a coachdesk server over HTTP and WebSocket.
//!
//! The session token returned by sign-in is kept in memory and, when a cache
//! file is configured, on disk. On connect a cached token is verified against
//! the server; a valid one makes the user a returning user without a new
//! sign-in.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use coachdesk_server::{
    domain::{CollectionPath, Record, RecordFields, RecordId, UserId},
    infrastructure::dto::{
        http::{
            CreateRecordRequestDto, CreateRecordResponseDto, CustomTokenRequestDto,
            ErrorResponseDto, RecordDto, SessionDto, SignInResponseDto,
        },
        websocket::ServerFrame,
    },
};
use futures_util::{StreamExt, stream};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{config::StoreConfig, error::ClientError};

use super::{Backend, Connection, DocumentStore, IdentityClient, SnapshotStream};

/// Header carrying the site's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Backend for a server reachable over the network
#[derive(Debug, Clone, Default)]
pub struct RemoteBackend {
    http: reqwest::Client,
    session_cache: Option<PathBuf>,
}

impl RemoteBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist the session token at `path` so later runs resume the same user
    pub fn with_session_cache(path: PathBuf) -> Self {
        Self {
            http: reqwest::Client::new(),
            session_cache: Some(path),
        }
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    async fn connect(&self, config: &StoreConfig) -> Result<Connection, ClientError> {
        let base = config.endpoint.trim().trim_end_matches('/').to_string();
        let health = self
            .http
            .get(format!("{base}/api/health"))
            .send()
            .await
            .map_err(|e| ClientError::ConnectionInitFailed(e.to_string()))?;
        if !health.status().is_success() {
            return Err(ClientError::ConnectionInitFailed(format!(
                "health check returned {}",
                health.status()
            )));
        }
        tracing::info!("Connected to {} (project '{}')", base, config.project_id);

        let (user, _) = watch::channel(None);
        let session = Arc::new(RemoteSession {
            http: self.http.clone(),
            base,
            api_key: config.api_key.clone(),
            token: RwLock::new(None),
            user,
            cache: self.session_cache.clone(),
        });
        session.restore().await;

        Ok(Connection {
            identity: session.clone(),
            store: Arc::new(RemoteStore { session }),
        })
    }
}

/// Shared HTTP state of one connection
struct RemoteSession {
    http: reqwest::Client,
    base: String,
    api_key: String,
    token: RwLock<Option<String>>,
    user: watch::Sender<Option<UserId>>,
    cache: Option<PathBuf>,
}

impl RemoteSession {
    fn url(&self, rest: &str) -> String {
        format!("{}/api/{}", self.base, rest)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.api_key.is_empty() {
            builder
        } else {
            builder.header(API_KEY_HEADER, &self.api_key)
        }
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token().ok_or(ClientError::NotReady)?;
        Ok(self.request(builder).bearer_auth(token))
    }

    fn adopt(&self, token: String, uid: UserId) {
        if let Some(path) = &self.cache
            && let Err(e) = write_cached_token(path, &token)
        {
            tracing::warn!("Cannot cache session at {}: {}", path.display(), e);
        }
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
        self.user.send_replace(Some(uid));
    }

    /// Resume a cached session when the server still accepts it
    async fn restore(&self) {
        let Some(path) = &self.cache else {
            return;
        };
        let Some(token) = read_cached_token(path) else {
            return;
        };

        let verified = self
            .request(self.http.get(self.url("auth/session")))
            .bearer_auth(&token)
            .send()
            .await;
        let session = match verified {
            Ok(resp) if resp.status().is_success() => resp.json::<SessionDto>().await.ok(),
            Ok(resp) => {
                tracing::info!("Cached session rejected ({})", resp.status());
                None
            }
            Err(e) => {
                tracing::warn!("Cannot verify cached session: {}", e);
                None
            }
        };

        match session.and_then(|s| UserId::new(s.uid).ok()) {
            Some(uid) => {
                tracing::info!("Resuming session for '{}'", uid);
                self.adopt(token, uid);
            }
            None => {
                if let Err(e) = std::fs::remove_file(path) {
                    tracing::debug!("Cannot remove stale session cache: {}", e);
                }
            }
        }
    }

    async fn sign_in(&self, builder: RequestBuilder) -> Result<UserId, ClientError> {
        let resp = self
            .request(builder)
            .send()
            .await
            .map_err(|e| ClientError::AuthFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ClientError::AuthFailed(error_message(resp).await));
        }
        let body: SignInResponseDto = resp
            .json()
            .await
            .map_err(|e| ClientError::AuthFailed(e.to_string()))?;
        let uid = UserId::new(body.uid).map_err(|e| ClientError::AuthFailed(e.to_string()))?;
        self.adopt(body.session_token, uid.clone());
        Ok(uid)
    }

    fn ws_url(&self, path: &CollectionPath) -> Result<String, ClientError> {
        let token = self.token().ok_or(ClientError::NotReady)?;
        let base = if let Some(rest) = self.base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base.clone()
        };
        Ok(format!("{base}/ws/{path}?token={token}"))
    }
}

fn read_cached_token(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// The session token is a bearer credential; on unix only the owner may read it.
fn write_cached_token(path: &Path, token: &str) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // `mode` only applies on create; tighten a file left by an older run.
        if path.exists() {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    let mut file = options.open(path)?;
    std::io::Write::write_all(&mut file, token.as_bytes())
}

/// Best-effort extraction of the server's error message
async fn error_message(resp: Response) -> String {
    let status = resp.status();
    match resp.json::<ErrorResponseDto>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    }
}

#[async_trait]
impl IdentityClient for RemoteSession {
    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.user.subscribe()
    }

    async fn sign_in_anonymously(&self) -> Result<UserId, ClientError> {
        self.sign_in(self.http.post(self.url("auth/anonymous")))
            .await
    }

    async fn sign_in_with_custom_token(&self, token: &str) -> Result<UserId, ClientError> {
        let request = self
            .http
            .post(self.url("auth/custom-token"))
            .json(&CustomTokenRequestDto {
                token: token.to_string(),
            });
        self.sign_in(request).await
    }
}

struct RemoteStore {
    session: Arc<RemoteSession>,
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn create(
        &self,
        path: &CollectionPath,
        author: &UserId,
        fields: RecordFields,
    ) -> Result<RecordId, ClientError> {
        tracing::debug!("Appending to {} as '{}'", path, author);
        let body = CreateRecordRequestDto {
            fields: Value::Object(fields.into_map()),
        };
        let resp = self
            .session
            .authorized(self.session.http.post(self.session.url(&path.to_string())))?
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::RemoteWriteFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ClientError::RemoteWriteFailed(error_message(resp).await));
        }
        let created: CreateRecordResponseDto = resp
            .json()
            .await
            .map_err(|e| ClientError::RemoteWriteFailed(e.to_string()))?;
        RecordId::new(created.id).map_err(|e| ClientError::RemoteWriteFailed(e.to_string()))
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &RecordId,
    ) -> Result<Option<Record>, ClientError> {
        let url = self.session.url(&format!("{path}/{id}"));
        let resp = self
            .session
            .authorized(self.session.http.get(url))?
            .send()
            .await
            .map_err(|e| ClientError::RemoteReadFailed(e.to_string()))?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let dto: RecordDto = resp
                    .json()
                    .await
                    .map_err(|e| ClientError::RemoteReadFailed(e.to_string()))?;
                Record::try_from(dto)
                    .map(Some)
                    .map_err(|e| ClientError::RemoteReadFailed(e.to_string()))
            }
            _ => Err(ClientError::RemoteReadFailed(error_message(resp).await)),
        }
    }

    async fn delete(
        &self,
        path: &CollectionPath,
        id: &RecordId,
        caller: &UserId,
    ) -> Result<(), ClientError> {
        tracing::debug!("Deleting {}/{} as '{}'", path, id, caller);
        let url = self.session.url(&format!("{path}/{id}"));
        let resp = self
            .session
            .authorized(self.session.http.delete(url))?
            .send()
            .await
            .map_err(|e| ClientError::RemoteWriteFailed(e.to_string()))?;
        match resp.status() {
            status if status.is_success() => Ok(()),
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden),
            _ => Err(ClientError::RemoteWriteFailed(error_message(resp).await)),
        }
    }

    fn watch(&self, path: &CollectionPath) -> SnapshotStream {
        enum State {
            Connecting(Result<String, ClientError>),
            Open(
                tokio_tungstenite::WebSocketStream<
                    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
                >,
            ),
            Done,
        }

        let start = State::Connecting(self.session.ws_url(path));
        stream::unfold(start, |state| async move {
            let mut socket = match state {
                State::Connecting(Err(e)) => return Some((Err(e), State::Done)),
                State::Connecting(Ok(url)) => match connect_async(url).await {
                    Ok((socket, _)) => socket,
                    Err(e) => {
                        return Some((Err(ClientError::RemoteReadFailed(e.to_string())), State::Done));
                    }
                },
                State::Open(socket) => socket,
                State::Done => return None,
            };

            loop {
                match socket.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let snapshot = parse_frame(text.as_str());
                        return Some((snapshot, State::Open(socket)));
                    }
                    Some(Ok(Message::Close(_))) | None => return None,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        return Some((Err(ClientError::RemoteReadFailed(e.to_string())), State::Done));
                    }
                }
            }
        })
        .boxed()
    }
}

fn parse_frame(text: &str) -> Result<Vec<Record>, ClientError> {
    let frame: ServerFrame =
        serde_json::from_str(text).map_err(|e| ClientError::RemoteReadFailed(e.to_string()))?;
    match frame {
        ServerFrame::Snapshot(snapshot) => snapshot
            .records
            .into_iter()
            .map(|dto| {
                Record::try_from(dto).map_err(|e| ClientError::RemoteReadFailed(e.to_string()))
            })
            .collect(),
        ServerFrame::Error(error) => Err(ClientError::RemoteReadFailed(error.error)),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    use super::*;

    #[test]
    fn test_cached_token_round_trip() {
        // テスト項目: キャッシュしたセッショントークンを読み戻せ、上書きで古い内容が残らない
        // given (前提条件):
        let path = std::env::temp_dir().join(format!(
            "coachdesk-cache-write-{}.session",
            std::process::id()
        ));

        // when (操作):
        write_cached_token(&path, "a-much-longer-first-token").unwrap();
        write_cached_token(&path, "second").unwrap();

        // then (期待する結果):
        assert_eq!(read_cached_token(&path), Some("second".to_string()));
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(unix)]
    #[test]
    fn test_cached_token_is_owner_only() {
        // テスト項目: キャッシュファイルは所有者だけが読み書きできる
        use std::os::unix::fs::PermissionsExt;

        // given (前提条件):
        let path = std::env::temp_dir().join(format!(
            "coachdesk-cache-mode-{}.session",
            std::process::id()
        ));
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        // when (操作):
        write_cached_token(&path, "fresh").unwrap();

        // then (期待する結果):
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let _ = std::fs::remove_file(&path);
    }

    fn config(server: &MockServer) -> StoreConfig {
        StoreConfig {
            endpoint: format!("{}/", server.uri()),
            api_key: "site-key".to_string(),
            project_id: "coach".to_string(),
        }
    }

    async fn healthy_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_connect_fails_when_health_check_fails() {
        // テスト項目: ヘルスチェックが失敗すると ConnectionInitFailed になる
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        // when (操作):
        let result = RemoteBackend::new().connect(&config(&server)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::ConnectionInitFailed(_))));
    }

    #[tokio::test]
    async fn test_create_before_sign_in_is_not_ready() {
        // テスト項目: サインイン前の書き込みは NotReady になりリクエストは送られない
        // given (前提条件):
        let server = healthy_server().await;
        let connection = RemoteBackend::new().connect(&config(&server)).await.unwrap();
        let path = CollectionPath::from_segments("coach-site", "messages").unwrap();
        let someone = UserId::new("someone".to_string()).unwrap();

        // when (操作):
        let result = connection
            .store
            .create(&path, &someone, RecordFields::text("hi").unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(ClientError::NotReady));
    }

    #[tokio::test]
    async fn test_sign_in_then_create_sends_bearer_and_api_key() {
        // テスト項目: サインイン後の書き込みはセッショントークンと API キー付きで送られる
        // given (前提条件):
        let server = healthy_server().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/anonymous"))
            .and(header(API_KEY_HEADER, "site-key"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "uid": "anon-1",
                "session_token": "sess-1",
                "anonymous": true
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/artifacts/coach-site/public/data/messages"))
            .and(header("authorization", "Bearer sess-1"))
            .and(body_json(serde_json::json!({"fields": {"text": "hello"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "rec-1"})))
            .expect(1)
            .mount(&server)
            .await;
        let connection = RemoteBackend::new().connect(&config(&server)).await.unwrap();

        // when (操作):
        let uid = connection.identity.sign_in_anonymously().await.unwrap();
        let id = connection
            .store
            .create(
                &CollectionPath::from_segments("coach-site", "messages").unwrap(),
                &uid,
                RecordFields::text("hello").unwrap(),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(uid.as_str(), "anon-1");
        assert_eq!(id.as_str(), "rec-1");
        assert_eq!(connection.identity.subscribe().borrow().clone(), Some(uid));
    }

    #[tokio::test]
    async fn test_rejected_custom_token_is_auth_failure() {
        // テスト項目: サーバーがトークンを拒否すると、その理由付きで AuthFailed になる
        // given (前提条件):
        let server = healthy_server().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/custom-token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "Custom token rejected: Custom token has already been used"
            })))
            .mount(&server)
            .await;
        let connection = RemoteBackend::new().connect(&config(&server)).await.unwrap();

        // when (操作):
        let result = connection.identity.sign_in_with_custom_token("used").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ClientError::AuthFailed(
                "Custom token rejected: Custom token has already been used".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_error_frame() {
        // テスト項目: エラーフレームは RemoteReadFailed として扱われる
        // when (操作):
        let result = parse_frame(r#"{"type":"error","error":"store offline"}"#);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ClientError::RemoteReadFailed("store offline".to_string()))
        );
    }
}
