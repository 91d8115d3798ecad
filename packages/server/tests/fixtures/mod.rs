//! Test fixtures: an in-process server bound to an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use coachdesk_server::{
    config::CustomTokenArg,
    domain::UserId,
    ui::{router, state::AppState},
};
use tokio::{net::TcpListener, task::JoinHandle};

pub const APP_ID: &str = "coach-site";

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with no custom tokens issued
    pub async fn start() -> Self {
        Self::start_with_tokens(&[]).await
    }

    /// Start a server with `(token, uid)` custom tokens issued
    pub async fn start_with_tokens(tokens: &[(&str, &str)]) -> Self {
        let grants: Vec<CustomTokenArg> = tokens
            .iter()
            .map(|(token, uid)| CustomTokenArg {
                token: token.to_string(),
                user_id: UserId::new(uid.to_string()).expect("valid uid"),
            })
            .collect();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = Arc::new(AppState::in_memory(&grants));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router(state)).await;
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/api/artifacts/{}/public/data/{}",
            self.base_url(),
            APP_ID,
            collection
        )
    }

    /// Sign in anonymously, returning `(uid, session_token)`
    pub async fn sign_in_anonymous(&self, client: &reqwest::Client) -> (String, String) {
        let body: serde_json::Value = client
            .post(format!("{}/api/auth/anonymous", self.base_url()))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        (
            body["uid"].as_str().expect("uid").to_string(),
            body["session_token"].as_str().expect("token").to_string(),
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
