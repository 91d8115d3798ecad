//! Data transfer objects shared by the HTTP and WebSocket layers and by clients.

pub mod http;
pub mod websocket;
