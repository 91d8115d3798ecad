//! Layered configuration resolution.
//!
//! Sources are probed in priority order and the first one yielding a
//! structurally valid [`SiteConfig`] wins. Lower-priority sources are not
//! consulted once a winner is found.

use std::path::{Path, PathBuf};

use crate::error::ClientError;

use super::types::{ChatConfig, SiteConfig, StoreConfig};

pub const ENV_STORE_CONFIG: &str = "COACHDESK_STORE_CONFIG";
pub const ENV_APP_ID: &str = "COACHDESK_APP_ID";
pub const ENV_INITIAL_AUTH_TOKEN: &str = "COACHDESK_INITIAL_AUTH_TOKEN";
pub const ENV_CHAT_API_KEY: &str = "COACHDESK_CHAT_API_KEY";
pub const ENV_CHAT_MODEL: &str = "COACHDESK_CHAT_MODEL";

type Probe = Box<dyn Fn() -> Option<SiteConfig> + Send + Sync>;

/// One named provider of site configuration
pub struct ConfigSource {
    name: String,
    probe: Probe,
}

impl std::fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ConfigSource {
    pub fn new(
        name: impl Into<String>,
        probe: impl Fn() -> Option<SiteConfig> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            probe: Box::new(probe),
        }
    }

    /// A source that always yields `config`
    pub fn fixed(name: impl Into<String>, config: SiteConfig) -> Self {
        Self::new(name, move || Some(config.clone()))
    }

    /// Build-time environment variables
    pub fn environment() -> Self {
        Self::new("environment", || {
            from_variables(|key| std::env::var(key).ok())
        })
    }

    /// JSON document injected by the hosting environment
    pub fn host_file(path: PathBuf) -> Self {
        let name = format!("host file {}", path.display());
        Self::new(name, move || read_host_file(&path))
    }

    /// Compiled-in fallback; empty, so it never validates on its own
    pub fn hardcoded() -> Self {
        Self::fixed("hardcoded", SiteConfig::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn probe(&self) -> Option<SiteConfig> {
        (self.probe)()
    }
}

/// Sources in their default priority: environment, host file (when given), hardcoded
pub fn default_sources(host_file: Option<PathBuf>) -> Vec<ConfigSource> {
    let mut sources = Vec::with_capacity(3);
    sources.push(ConfigSource::environment());
    if let Some(path) = host_file {
        sources.push(ConfigSource::host_file(path));
    }
    sources.push(ConfigSource::hardcoded());
    sources
}

/// Pick the first source that yields a valid configuration
///
/// # Returns
///
/// * `Ok(SiteConfig)` - the winning configuration
/// * `Err(ClientError::ConfigMissing)` - no source produced a valid one
pub fn resolve_config(sources: &[ConfigSource]) -> Result<SiteConfig, ClientError> {
    for source in sources {
        match source.probe() {
            Some(config) if config.is_valid() => {
                tracing::info!(
                    "Using site configuration from {} (app '{}')",
                    source.name(),
                    config.app_id
                );
                return Ok(config);
            }
            Some(_) => tracing::debug!("Configuration from {} is incomplete", source.name()),
            None => tracing::debug!("No configuration from {}", source.name()),
        }
    }
    tracing::error!("No usable site configuration in {} sources", sources.len());
    Err(ClientError::ConfigMissing)
}

/// Assemble a configuration from `COACHDESK_*` variables via `lookup`
pub fn from_variables(lookup: impl Fn(&str) -> Option<String>) -> Option<SiteConfig> {
    let raw_store = lookup(ENV_STORE_CONFIG)?;
    let store: StoreConfig = match serde_json::from_str(&raw_store) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", ENV_STORE_CONFIG, e);
            return None;
        }
    };

    let chat = lookup(ENV_CHAT_API_KEY)
        .filter(|key| !key.trim().is_empty())
        .map(|key| {
            let mut chat = ChatConfig::new(key);
            if let Some(model) = lookup(ENV_CHAT_MODEL).filter(|m| !m.trim().is_empty()) {
                chat.model = model;
            }
            chat
        });

    Some(SiteConfig {
        store,
        app_id: lookup(ENV_APP_ID).unwrap_or_default(),
        initial_auth_token: lookup(ENV_INITIAL_AUTH_TOKEN),
        chat,
    })
}

fn read_host_file(path: &Path) -> Option<SiteConfig> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("Cannot read host config {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed host config {}: {}", path.display(), e);
            None
        }
    }
}
