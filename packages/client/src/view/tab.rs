//! Site sections.

use std::{fmt, str::FromStr};

use crate::error::ClientError;

/// External booking form, opened outside the site
pub const BOOKING_FORM_URL: &str = "https://forms.example.com/coachdesk/book";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Home,
    About,
    Services,
    Booking,
    Contact,
    Messages,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Home,
        Tab::About,
        Tab::Services,
        Tab::Booking,
        Tab::Contact,
        Tab::Messages,
        Tab::Chat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::About => "about",
            Tab::Services => "services",
            Tab::Booking => "booking",
            Tab::Contact => "contact",
            Tab::Messages => "messages",
            Tab::Chat => "chat",
        }
    }

    /// Sections that need a signed-in visitor
    pub fn needs_session(&self) -> bool {
        matches!(self, Tab::Contact | Tab::Messages)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.label() == wanted)
            .ok_or_else(|| ClientError::InvalidInput(format!("Unknown section '{}'", s.trim())))
    }
}
