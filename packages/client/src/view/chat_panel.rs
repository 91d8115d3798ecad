//! Chat widget state.

use crate::{
    chat::{ChatRelay, ChatTurn},
    error::ClientError,
};

/// Shown above an empty transcript; never sent to the model
pub const CHAT_GREETING: &str =
    "Hi! Ask me anything about coaching sessions, sports massage or booking.";

#[derive(Debug, Default)]
pub struct ChatPanel {
    turns: Vec<ChatTurn>,
    loading: bool,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record the question and return the turns that preceded it
    pub fn begin(&mut self, question: &str) -> Result<Vec<ChatTurn>, ClientError> {
        if self.loading {
            return Err(ClientError::InvalidInput(
                "Still waiting for the previous answer.".to_string(),
            ));
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(ClientError::InvalidInput("Please type a question.".to_string()));
        }
        let prior = self.turns.clone();
        self.turns.push(ChatTurn::user(question));
        self.loading = true;
        Ok(prior)
    }

    pub fn finish(&mut self, answer: String) {
        self.turns.push(ChatTurn::model(answer));
        self.loading = false;
    }

    /// Ask the relay; failures become the apology text in the transcript
    pub async fn ask(&mut self, relay: &ChatRelay, question: &str) -> Result<String, ClientError> {
        let prior = self.begin(question)?;
        let answer = relay.ask_or_apologize(&prior, question.trim()).await;
        self.finish(answer.clone());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    use super::*;
    use crate::{
        chat::{APOLOGY, ChatRole},
        config::ChatConfig,
    };

    #[test]
    fn test_begin_while_loading_is_refused() {
        // テスト項目: 回答待ちの間は次の質問を受け付けない
        // given (前提条件):
        let mut panel = ChatPanel::new();
        panel.begin("first?").unwrap();

        // when (操作):
        let second = panel.begin("second?");

        // then (期待する結果):
        assert!(second.is_err());
        assert_eq!(panel.turns().len(), 1);
        assert!(panel.is_loading());
    }

    #[test]
    fn test_begin_returns_prior_turns() {
        // テスト項目: begin は新しい質問より前の発言だけを返す
        // given (前提条件):
        let mut panel = ChatPanel::new();
        panel.begin("first?").unwrap();
        panel.finish("answer".to_string());

        // when (操作):
        let prior = panel.begin("second?").unwrap();

        // then (期待する結果):
        assert_eq!(prior.len(), 2);
        assert_eq!(prior[1].role, ChatRole::Model);
        assert_eq!(panel.turns().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_relay_appends_apology() {
        // テスト項目: 中継が失敗すると謝罪文が会話に追加され、読み込み状態が解除される
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let mut config = ChatConfig::new("g-key");
        config.endpoint = server.uri();
        let relay = ChatRelay::new(&config);
        let mut panel = ChatPanel::new();

        // when (操作):
        let answer = panel.ask(&relay, "Do you do sports massage?").await.unwrap();

        // then (期待する結果):
        assert_eq!(answer, APOLOGY);
        assert!(!panel.is_loading());
        assert_eq!(panel.turns().last().unwrap().text, APOLOGY);
    }
}
