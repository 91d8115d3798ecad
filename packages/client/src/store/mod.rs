//! Namespaced document writes and live reads.

pub mod writer;

pub use writer::{CONTACTS, DocumentWriter, MESSAGES, sort_by_created_at};
