//! Core domain models for the document store.

use serde::{Deserialize, Serialize};

use super::{
    path::CollectionPath,
    value_object::{RecordFields, RecordId, SessionToken, Timestamp, UserId},
};

/// A stored document: a chat message or a contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Record identifier, unique within its collection
    pub id: RecordId,
    /// Namespace and collection the record lives in
    pub path: CollectionPath,
    /// Identity of the user who created the record
    pub author_id: UserId,
    /// Caller supplied body
    pub fields: RecordFields,
    /// Store-assigned creation time
    pub created_at: Timestamp,
}

impl Record {
    /// Create a new record
    pub fn new(
        id: RecordId,
        path: CollectionPath,
        author_id: UserId,
        fields: RecordFields,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            path,
            author_id,
            fields,
            created_at,
        }
    }

    /// Whether `user` authored this record
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }

    /// The `text` field, if the record has one
    pub fn text(&self) -> Option<&str> {
        self.fields.get_str("text")
    }
}

/// Result of a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The signed-in user
    pub user_id: UserId,
    /// Token the caller presents on later requests
    pub session_token: SessionToken,
    /// Whether the user was created anonymously
    pub anonymous: bool,
}

impl Credential {
    pub fn new(user_id: UserId, session_token: SessionToken, anonymous: bool) -> Self {
        Self {
            user_id,
            session_token,
            anonymous,
        }
    }
}
