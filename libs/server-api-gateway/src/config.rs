use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::TransportOptions;
use crate::session::DEFAULT_API_VERSION;

/// Prefix of environment overrides, e.g. `SERVER_API_HTTP__TIMEOUT_SECS=30`.
pub const ENV_PREFIX: &str = "SERVER_API_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Connection settings for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Server address without the `/api/...` suffix.
    pub server: String,
    pub version: String,
    pub site_id: Option<String>,
    pub http: HttpOptionsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: "http://localhost".to_owned(),
            version: DEFAULT_API_VERSION.to_owned(),
            site_id: None,
            http: HttpOptionsConfig::default(),
        }
    }
}

/// Session-wide transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpOptionsConfig {
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub proxy: Option<String>,
    pub verify_tls: bool,
}

impl Default for HttpOptionsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: None,
            proxy: None,
            verify_tls: true,
        }
    }
}

impl ServerConfig {
    /// Defaults, then the YAML file if given, then `SERVER_API_*` variables.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the layered configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a layer holds a value of the wrong type
    /// or an unknown key.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    #[must_use]
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: self.http.timeout_secs.map(Duration::from_secs),
            connect_timeout: self.http.connect_timeout_secs.map(Duration::from_secs),
            proxy: self.http.proxy.clone(),
            verify_tls: Some(self.http.verify_tls),
            query: Vec::new(),
        }
    }
}
