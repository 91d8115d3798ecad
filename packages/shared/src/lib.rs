//! Shared utilities for coachdesk binaries and libraries.

pub mod logger;
pub mod time;
