//! Error types for the profile workflow and its collaborators.

use nanokey_identity::IdentityError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while publishing an assertion.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The HTTP client could not be built.
    #[error("cannot create HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request did not reach the server or the response was unreadable.
    #[error("network error contacting {url}")]
    Network {
        /// The server URL.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server {url} rejected the nanopublication with status {status}: {body}")]
    Rejected {
        /// The server URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The server accepted the request but did not say where it was published.
    #[error("server {url} returned no nanopublication URI")]
    MissingUri {
        /// The server URL.
        url: String,
    },
}

/// Errors raised while storing or loading the profile record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Reading or writing the profile file failed.
    #[error("cannot access profile file {}", path.display())]
    Io {
        /// The profile file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The profile file could not be encoded or decoded.
    #[error("profile file {} is not valid YAML", path.display())]
    Yaml {
        /// The profile file.
        path: PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// No profile has been stored yet.
    #[error("no profile found at {}", path.display())]
    NotFound {
        /// The expected profile file.
        path: PathBuf,
    },
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No home directory to place the default configuration directory in.
    #[error("cannot determine home directory; set NANOKEY_CONFIG_DIR or pass --config-dir")]
    NoHomeDir,

    /// A configuration source was malformed.
    #[error("invalid configuration")]
    Config(#[from] config::ConfigError),
}

/// Error type for the overwrite confirmation prompt.
pub type PromptError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a profile setup run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The identifier or name was rejected.
    #[error(transparent)]
    Input(#[from] nanokey_core::Error),

    /// A key lifecycle step failed.
    #[error(transparent)]
    Key(#[from] IdentityError),

    /// Publishing the assertion failed; no profile was written.
    #[error("publish failed")]
    Publish(#[from] PublishError),

    /// The profile record could not be written.
    #[error("cannot persist profile")]
    Persist(#[from] RecordError),

    /// The overwrite confirmation could not be obtained.
    #[error("confirmation prompt failed")]
    Prompt(#[source] PromptError),
}

impl WorkflowError {
    /// Returns the workflow step the error aborted.
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            Self::Input(_) => "validate input",
            Self::Key(IdentityError::ConfigDir { .. }) => "prepare configuration directory",
            Self::Key(IdentityError::PublicKeyUnreadable { .. }) => "read public key",
            Self::Key(_) | Self::Prompt(_) => "resolve keypair",
            Self::Publish(_) => "publish profile",
            Self::Persist(_) => "persist profile",
        }
    }
}

/// A specialized Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
