//! Session bootstrap: configuration, connection and identity.

pub mod bootstrapper;
pub mod state;
pub mod subscription;

pub use bootstrapper::{SessionBootstrapper, SessionHandle};
pub use state::Session;
pub use subscription::Subscription;
