//! Stateless relay to a `generateContent` endpoint.
//!
//! Each question is sent together with the prior turns of the conversation.
//! A fixed instruction keeping the assistant on topic is appended to the
//! outgoing question; it is never shown in the transcript.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::ChatConfig, error::ClientError};

/// Appended to every outgoing question
pub const CHAT_INSTRUCTION: &str = "\n\n(Answer as the assistant of a sports-coaching and \
massage-therapy practice. Only discuss training, coaching sessions, sports massage, recovery \
and booking. Keep the answer under 80 words. If the question is off topic, politely steer back.)";

/// Shown instead of an answer when the relay fails
pub const APOLOGY: &str =
    "Sorry, I couldn't answer that right now. Please try again later or use the contact form.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry of the visible transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<ChatRole>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl From<&ChatTurn> for Content {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: Some(turn.role),
            parts: vec![Part {
                text: Some(turn.text.clone()),
            }],
        }
    }
}

/// Client for the chat widget's language model
#[derive(Debug, Clone)]
pub struct ChatRelay {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatRelay {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Ask `question` given the transcript so far
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - the first candidate's text
    /// * `Err(ClientError::ChatRelayFailed)` - transport error, non-2xx status or
    ///   a body without `candidates[0].content.parts[0].text`
    pub async fn ask(&self, prior: &[ChatTurn], question: &str) -> Result<String, ClientError> {
        let mut contents: Vec<Content> = prior.iter().map(Content::from).collect();
        contents.push(Content::from(&ChatTurn::user(format!(
            "{question}{CHAT_INSTRUCTION}"
        ))));

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        tracing::debug!("Relaying chat question to model '{}'", self.model);

        let resp = self
            .http
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(&GenerateRequest { contents })
            .send()
            .await
            .map_err(relay_failure)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("Chat API returned {}: {}", status, body);
            return Err(ClientError::ChatRelayFailed(format!("status {status}")));
        }

        let body: GenerateResponse = resp.json().await.map_err(relay_failure)?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| ClientError::ChatRelayFailed("response has no answer text".to_string()))
    }

    /// Like [`ChatRelay::ask`], but any failure becomes [`APOLOGY`]
    pub async fn ask_or_apologize(&self, prior: &[ChatTurn], question: &str) -> String {
        match self.ask(prior, question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("{}", e);
                APOLOGY.to_string()
            }
        }
    }
}

// The key rides in the query string, so error text must never carry the URL.
fn relay_failure(err: reqwest::Error) -> ClientError {
    ClientError::ChatRelayFailed(err.without_url().to_string())
}
