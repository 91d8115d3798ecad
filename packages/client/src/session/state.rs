//! Observable session state.

use coachdesk_server::domain::UserId;

use crate::error::ClientError;

/// What the site knows about the visitor
///
/// `ready` turns true once the identity question has been answered, either
/// with an identity or with an error. It never turns false again during a
/// session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<UserId>,
    pub ready: bool,
    pub error: Option<ClientError>,
}

impl Session {
    /// Session that ended before identity could be attempted
    pub fn failed(error: ClientError) -> Self {
        Self {
            identity: None,
            ready: false,
            error: Some(error),
        }
    }

    pub fn adopt(&mut self, identity: UserId) {
        self.identity = Some(identity);
        self.error = None;
        self.ready = true;
    }

    pub fn reject(&mut self, error: ClientError) {
        self.identity = None;
        self.error = Some(error);
        self.ready = true;
    }

    /// No further bootstrap progress is expected
    pub fn is_settled(&self) -> bool {
        self.ready || self.error.is_some()
    }

    /// The whole page should be replaced by the error screen
    pub fn is_fatal(&self) -> bool {
        self.error.as_ref().is_some_and(ClientError::is_terminal)
    }
}
