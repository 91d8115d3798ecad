//! Handler modules for HTTP and WebSocket endpoints.

mod auth;
mod error;
pub mod http;
pub mod websocket;

pub use error::ApiError;

// Re-export HTTP handlers
pub use http::{
    create_record, delete_record, get_record, get_session, health_check, list_records,
    sign_in_anonymous, sign_in_custom_token,
};

// Re-export WebSocket handlers
pub use websocket::watch_collection;
