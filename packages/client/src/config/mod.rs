//! Client configuration: command line arguments and the site configuration
//! with its layered resolution.

pub mod args;
pub mod resolver;
pub mod types;

pub use args::ClientArgs;
pub use resolver::{ConfigSource, default_sources, resolve_config};
pub use types::{ChatConfig, SiteConfig, StoreConfig};
