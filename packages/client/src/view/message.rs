//! Message board: composer state and line rendering.

use coachdesk_server::domain::{Record, RecordFields, RecordId, UserId};
use coachdesk_shared::time::timestamp_to_clock;

use crate::{
    error::ClientError,
    store::{DocumentWriter, MESSAGES, sort_by_created_at},
};

/// One rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLine {
    pub id: RecordId,
    pub author: String,
    pub text: String,
    pub time: String,
    /// Only the author is offered a delete action
    pub deletable: bool,
}

/// `You` for the visitor's own messages, a shortened id for everyone else
pub fn author_label(author: &UserId, me: Option<&UserId>) -> String {
    if me == Some(author) {
        "You".to_string()
    } else {
        format!("User: {}...", author.short())
    }
}

/// Render a snapshot oldest first
pub fn render_lines(records: &[Record], me: Option<&UserId>) -> Vec<MessageLine> {
    let mut sorted = records.to_vec();
    sort_by_created_at(&mut sorted);
    sorted
        .iter()
        .map(|record| MessageLine {
            id: record.id.clone(),
            author: author_label(&record.author_id, me),
            text: record.text().unwrap_or_default().to_string(),
            time: timestamp_to_clock(record.created_at.value()),
            deletable: me.is_some_and(|me| record.is_owned_by(me)),
        })
        .collect()
}

/// Guards the send action of the message board
#[derive(Debug, Default)]
pub struct MessageComposer {
    sending: bool,
}

impl MessageComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn begin(&mut self, text: &str) -> Result<RecordFields, ClientError> {
        if self.sending {
            return Err(ClientError::InvalidInput(
                "Still sending the previous message.".to_string(),
            ));
        }
        let fields = RecordFields::text(text.trim())
            .map_err(|_| ClientError::InvalidInput("Message cannot be empty.".to_string()))?;
        self.sending = true;
        Ok(fields)
    }

    pub fn finish(&mut self) {
        self.sending = false;
    }

    pub async fn send(
        &mut self,
        writer: &DocumentWriter,
        text: &str,
    ) -> Result<RecordId, ClientError> {
        let fields = self.begin(text)?;
        let result = writer.append(MESSAGES, fields).await;
        self.finish();
        result
    }
}
