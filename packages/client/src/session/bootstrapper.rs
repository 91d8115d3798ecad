//! Session bootstrapper
//!
//! Resolves configuration, connects the backend and keeps the session's
//! identity in sync with the identity service. When no identity exists the
//! bootstrapper acquires one: with the one-time initial auth token if the
//! configuration carries one, anonymously otherwise. Failures are recorded on
//! the session and never retried; a reload starts over.

use std::sync::Arc;

use coachdesk_server::domain::UserId;
use tokio::sync::watch;

use crate::{
    backend::{Backend, Connection, IdentityClient},
    chat::ChatRelay,
    config::{ConfigSource, SiteConfig, resolve_config},
    error::ClientError,
    store::DocumentWriter,
};

use super::{state::Session, subscription::Subscription};

pub struct SessionBootstrapper {
    sources: Vec<ConfigSource>,
    backend: Arc<dyn Backend>,
}

impl SessionBootstrapper {
    pub fn new(sources: Vec<ConfigSource>, backend: Arc<dyn Backend>) -> Self {
        Self { sources, backend }
    }

    /// Run one bootstrap
    ///
    /// Configuration and connection failures settle the session immediately
    /// with `ready == false`. Otherwise the identity listener is started and
    /// the returned handle owns it.
    pub async fn initialize(&self) -> SessionHandle {
        let config = match resolve_config(&self.sources) {
            Ok(config) => config,
            Err(e) => return SessionHandle::failed(e, None),
        };

        let connection = match self.backend.connect(&config.store).await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::error!("Failed to initialize the backend: {}", e);
                return SessionHandle::failed(e, Some(config));
            }
        };

        let (session, receiver) = watch::channel(Session::default());
        let token = config.auth_token().map(str::to_string);
        let listener = Subscription::spawn(follow_identity(
            connection.identity.clone(),
            token,
            session,
        ));

        SessionHandle {
            session: receiver,
            config: Some(config),
            connection: Some(connection),
            _listener: Some(listener),
        }
    }
}

/// Mirror identity changes into the session, acquiring one when absent
async fn follow_identity(
    identity: Arc<dyn IdentityClient>,
    mut token: Option<String>,
    session: watch::Sender<Session>,
) {
    let mut changes = identity.subscribe();
    loop {
        let current = changes.borrow_and_update().clone();
        match current {
            Some(uid) => {
                tracing::debug!("Identity is '{}'", uid);
                session.send_modify(|s| s.adopt(uid));
            }
            None => match acquire(identity.as_ref(), token.take()).await {
                Ok(uid) => session.send_modify(|s| s.adopt(uid)),
                Err(e) => {
                    tracing::error!("{}", e);
                    session.send_modify(|s| s.reject(e));
                }
            },
        }

        if changes.changed().await.is_err() {
            break;
        }
    }
}

/// The initial auth token is offered at most once per bootstrap
async fn acquire(
    identity: &dyn IdentityClient,
    token: Option<String>,
) -> Result<UserId, ClientError> {
    match token {
        Some(token) => {
            tracing::info!("Signing in with the initial auth token");
            identity.sign_in_with_custom_token(&token).await
        }
        None => {
            tracing::info!("Signing in anonymously");
            identity.sign_in_anonymously().await
        }
    }
}

/// Result of a bootstrap; dropping it stops the identity listener
pub struct SessionHandle {
    session: watch::Receiver<Session>,
    config: Option<SiteConfig>,
    connection: Option<Connection>,
    _listener: Option<Subscription>,
}

impl SessionHandle {
    fn failed(error: ClientError, config: Option<SiteConfig>) -> Self {
        let (_, receiver) = watch::channel(Session::failed(error));
        Self {
            session: receiver,
            config,
            connection: None,
            _listener: None,
        }
    }

    /// Current snapshot of the session
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.clone()
    }

    /// Wait until the identity question is answered
    pub async fn settled(&mut self) -> Session {
        let settled = self
            .session
            .wait_for(Session::is_settled)
            .await
            .map(|session| (*session).clone());
        match settled {
            Ok(session) => session,
            Err(_) => self.session.borrow().clone(),
        }
    }

    pub fn config(&self) -> Option<&SiteConfig> {
        self.config.as_ref()
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Writer bound to the site namespace and the current identity
    pub fn writer(&self) -> Result<DocumentWriter, ClientError> {
        let connection = self.connection.as_ref().ok_or(ClientError::NotReady)?;
        let app_id = self
            .config
            .as_ref()
            .and_then(SiteConfig::namespace)
            .ok_or(ClientError::ConfigMissing)?;
        Ok(DocumentWriter::new(
            connection.store.clone(),
            app_id,
            self.session.borrow().identity.clone(),
        ))
    }

    /// Chat relay, when the configuration names a chat endpoint
    pub fn chat_relay(&self) -> Option<ChatRelay> {
        self.config
            .as_ref()
            .and_then(|config| config.chat.as_ref())
            .map(ChatRelay::new)
    }
}
