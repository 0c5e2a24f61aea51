//! Layered configuration.
//!
//! Values are resolved in order: built-in defaults, then
//! `<config_dir>/settings.yml` if present, then `NANOKEY_*` environment
//! variables. Command-line flags are applied on top by the caller.

use crate::error::SettingsError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of the environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "NANOKEY";

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "NANOKEY_CONFIG_DIR";

/// Name of the default configuration directory under the home directory.
pub const DEFAULT_DIR_NAME: &str = ".nanopub";

/// File name of the optional settings file inside the configuration directory.
pub const SETTINGS_FILE: &str = "settings.yml";

/// Default nanopub server.
pub const DEFAULT_SERVER_URL: &str = "https://np.petapico.org/";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_KEY_BITS: usize = 2048;

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the keypair and the profile record.
    pub config_dir: PathBuf,
    /// Nanopub server the profile is published to.
    pub server_url: String,
    /// RSA modulus size for generated keys.
    pub key_bits: usize,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Settings {
    /// Loads settings for `config_dir`, or for the default directory if none
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoHomeDir`] if no directory was given and the
    /// home directory is unknown, or [`SettingsError::Config`] if a source is
    /// malformed.
    pub fn load(config_dir: Option<PathBuf>) -> Result<Self, SettingsError> {
        let dir = match config_dir {
            Some(dir) => dir,
            None => default_config_dir()?,
        };
        Self::load_with(&dir, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(dir: &Path, env: Environment) -> Result<Self, SettingsError> {
        let dir_str = dir.to_string_lossy().into_owned();
        let file = dir.join(SETTINGS_FILE);

        let settings: Self = Config::builder()
            .set_default("server_url", DEFAULT_SERVER_URL)?
            .set_default("key_bits", DEFAULT_KEY_BITS as u64)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .add_source(File::new(&file.to_string_lossy(), FileFormat::Yaml).required(false))
            .add_source(env.try_parsing(true))
            .set_override("config_dir", dir_str)?
            .build()?
            .try_deserialize()?;

        tracing::debug!(
            config_dir = %settings.config_dir.display(),
            server_url = %settings.server_url,
            key_bits = settings.key_bits,
            "Loaded settings"
        );
        Ok(settings)
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the path of the optional settings file.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }
}

/// Returns the configuration directory used when none is given explicitly.
///
/// `NANOKEY_CONFIG_DIR` wins over `~/.nanopub`.
///
/// # Errors
///
/// Returns [`SettingsError::NoHomeDir`] if neither is available.
pub fn default_config_dir() -> Result<PathBuf, SettingsError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DIR_NAME))
        .ok_or(SettingsError::NoHomeDir)
}
