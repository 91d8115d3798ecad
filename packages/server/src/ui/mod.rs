//! HTTP / WebSocket server for the identity service and document store.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{router, run, serve};
