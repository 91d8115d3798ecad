//! Chat widget relay to a generative-language API.

pub mod relay;

pub use relay::{APOLOGY, CHAT_INSTRUCTION, ChatRelay, ChatRole, ChatTurn};
