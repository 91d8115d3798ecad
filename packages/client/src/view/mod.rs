//! View state for the site's sections.
//!
//! Plain state machines with no rendering of their own; the terminal front end
//! in [`crate::cli`] draws them.

pub mod chat_panel;
pub mod contact;
pub mod message;
pub mod notice;
pub mod tab;

pub use chat_panel::{CHAT_GREETING, ChatPanel};
pub use contact::{ContactForm, ContactSubmission, FormStatus};
pub use message::{MessageComposer, MessageLine, author_label, render_lines};
pub use notice::{NOTICE_TIMEOUT, Notice, NoticeBoard, NoticeKind};
pub use tab::{BOOKING_FORM_URL, Tab};
