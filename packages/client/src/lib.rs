//! Site client for coachdesk.
//!
//! [`session::SessionBootstrapper`] resolves the site configuration, connects
//! a [`backend::Backend`] and establishes the visitor's identity. Once the
//! session is ready, [`store::DocumentWriter`] appends, lists and removes
//! namespaced records, and [`chat::ChatRelay`] forwards chat questions to a
//! language model. [`cli`] wires everything into a terminal front end.

pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod view;

pub use config::ClientArgs;
pub use error::ClientError;
pub use cli::{CliError, run as run_client};
