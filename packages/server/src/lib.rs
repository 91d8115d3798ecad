//! Identity service and namespaced document store for the coachdesk site.
//!
//! The crate is layered: `domain` holds value objects, entities and the
//! repository traits; `usecase` holds the operations; `infrastructure` holds
//! the in-memory repositories and wire DTOs; `ui` exposes everything over
//! HTTP and WebSocket with axum.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerArgs;
pub use ui::run as run_server;
