//! Provider configuration loading.
//!
//! Settings are layered with figment: defaults, then a TOML file, then
//! `OVH_*` environment variables, then command-line flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli_args::GlobalArgs;
use crate::environment;
use crate::ovh::{ApiEndpoint, Credentials, DEFAULT_TIMEOUT, OvhClient, OvhError};

/// Prefix of the environment variables read as configuration.
pub const ENV_PREFIX: &str = "OVH_";
/// Variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "OVH_CONFIG_PATH";

const LOCAL_CONFIG_FILE: &str = "ovh.toml";
const XDG_PREFIX: &str = "ovh";
const XDG_CONFIG_FILE: &str = "config.toml";
const CONFIG_KEYS: &[&str] = &[
    "endpoint",
    "application_key",
    "application_secret",
    "consumer_key",
    "timeout_secs",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[source] Box<figment::Error>),
    #[error("configuration file {} does not exist", .0.display())]
    MissingFile(PathBuf),
    #[error("no OVH endpoint configured; set `endpoint`, OVH_ENDPOINT or --endpoint")]
    MissingEndpoint,
    #[error("an application secret is required when an application key is set")]
    MissingSecret,
    #[error("invalid client configuration: {0}")]
    Client(#[from] OvhError),
}

/// Settings needed to build an [`OvhClient`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: Option<String>,
    pub application_key: String,
    pub application_secret: String,
    pub consumer_key: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            application_key: String::new(),
            application_secret: String::new(),
            consumer_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<redacted>")
            .field("consumer_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Validate the settings and build the authenticated client.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when no endpoint is set, the endpoint is
    /// unknown, a key is set without its secret, or the HTTP client cannot
    /// be built.
    pub fn build_client(&self) -> Result<OvhClient, ConfigError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let endpoint = ApiEndpoint::resolve(endpoint)?;
        if !self.application_key.is_empty() && self.application_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        let credentials = Credentials::new(
            self.application_key.as_str(),
            self.application_secret.as_str(),
            self.consumer_key.as_str(),
        );
        let timeout = Duration::from_secs(self.timeout_secs);
        Ok(OvhClient::new(endpoint, credentials, timeout)?)
    }
}

/// Locate the configuration file.
///
/// An explicit path (flag, then `OVH_CONFIG_PATH`) must exist. Otherwise
/// `./ovh.toml` and then `$XDG_CONFIG_HOME/ovh/config.toml` are used when
/// present.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] when an explicit path is missing.
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    let explicit = explicit.map(Path::to_path_buf).or_else(|| {
        environment::non_empty_var(CONFIG_PATH_VAR).map(PathBuf::from)
    });
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(Some(path))
        } else {
            Err(ConfigError::MissingFile(path))
        };
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(Some(local));
    }
    Ok(xdg::BaseDirectories::with_prefix(XDG_PREFIX).find_config_file(XDG_CONFIG_FILE))
}

/// Merge every configuration layer into a [`ProviderConfig`].
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be found or parsed, or a
/// value has the wrong type.
pub fn load(global: &GlobalArgs) -> Result<ProviderConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ProviderConfig::default()));
    if let Some(path) = find_config_file(global.config.as_deref())? {
        debug!("loading configuration from {}", path.display());
        figment = figment.merge(Toml::file(path));
    }
    let figment = environment::with_lock(|| {
        figment.merge(Env::prefixed(ENV_PREFIX).only(CONFIG_KEYS))
    })
    .merge(Serialized::defaults(global));
    figment
        .extract()
        .map_err(|e| ConfigError::Figment(Box::new(e)))
}
