//! Contact form state.

use coachdesk_server::domain::{RecordFields, RecordId};
use serde_json::{Map, Value};

use crate::{
    error::ClientError,
    store::{CONTACTS, DocumentWriter},
};

/// What the visitor typed into the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    /// Parse `name | email | message`
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let mut parts = raw.splitn(3, '|').map(str::trim);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(email), Some(message)) => Ok(Self {
                name: name.to_string(),
                email: email.to_string(),
                message: message.to_string(),
            }),
            _ => Err(ClientError::InvalidInput(
                "Expected: name | email | message".to_string(),
            )),
        }
    }

    /// Check the fields and turn them into a record body
    pub fn validate(&self) -> Result<RecordFields, ClientError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() {
            return Err(ClientError::InvalidInput("Please enter your name.".to_string()));
        }
        let well_formed = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(ClientError::InvalidInput(
                "Please enter a valid email address.".to_string(),
            ));
        }
        if message.is_empty() {
            return Err(ClientError::InvalidInput("Please enter a message.".to_string()));
        }

        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.to_string()));
        fields.insert("email".to_string(), Value::String(email.to_string()));
        fields.insert("message".to_string(), Value::String(message.to_string()));
        RecordFields::new(fields).map_err(|e| ClientError::InvalidInput(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Sent,
    Failed(String),
}

/// Submission status of the contact form
#[derive(Debug, Default)]
pub struct ContactForm {
    status: FormStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn can_submit(&self) -> bool {
        self.status != FormStatus::Submitting
    }

    /// Validate and mark the form as submitting
    ///
    /// Refused while a previous submission is outstanding.
    pub fn begin(&mut self, submission: &ContactSubmission) -> Result<RecordFields, ClientError> {
        if !self.can_submit() {
            return Err(ClientError::InvalidInput(
                "Your message is still being sent.".to_string(),
            ));
        }
        let fields = submission.validate()?;
        self.status = FormStatus::Submitting;
        Ok(fields)
    }

    pub fn finish(&mut self, result: &Result<RecordId, ClientError>) {
        self.status = match result {
            Ok(_) => FormStatus::Sent,
            Err(e) => FormStatus::Failed(e.to_string()),
        };
    }

    pub async fn submit(
        &mut self,
        writer: &DocumentWriter,
        submission: &ContactSubmission,
    ) -> Result<RecordId, ClientError> {
        let fields = self.begin(submission)?;
        let result = writer.append(CONTACTS, fields).await;
        self.finish(&result);
        result
    }
}
