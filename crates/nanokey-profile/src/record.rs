//! The persisted profile record.

use crate::error::RecordError;
use nanokey_core::ValidatedOrcid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the profile record inside the configuration directory.
pub const PROFILE_FILE: &str = "profile.yml";

/// Summary of a completed profile setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// The user's ORCID iD, if linked.
    #[serde(default)]
    pub orcid_id: Option<ValidatedOrcid>,
    /// The user's full name.
    pub name: String,
    /// Location of the public key.
    #[serde(rename = "public_key")]
    pub public_key_path: PathBuf,
    /// Location of the private key.
    #[serde(rename = "private_key")]
    pub private_key_path: PathBuf,
    /// URI of the published key declaration, if the profile was published.
    #[serde(default, rename = "introduction_nanopub_uri")]
    pub published_uri: Option<String>,
}

impl ProfileRecord {
    /// Returns true if the profile was published to the network.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.published_uri.is_some()
    }
}

/// Persists profile records.
pub trait ProfileStore {
    /// Stores `record`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn store(&self, record: &ProfileRecord) -> Result<(), RecordError>;
}

/// Stores the profile as YAML in the configuration directory.
#[derive(Debug, Clone)]
pub struct YamlProfileStore {
    path: PathBuf,
}

impl YamlProfileStore {
    /// Creates a store writing `profile.yml` in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(PROFILE_FILE),
        }
    }

    /// Returns the profile file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no profile has been stored, or an
    /// I/O or YAML error if the file cannot be read.
    pub fn load(&self) -> Result<ProfileRecord, RecordError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                RecordError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                RecordError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        serde_yaml::from_str(&contents).map_err(|source| RecordError::Yaml {
            path: self.path.clone(),
            source,
        })
    }
}

impl ProfileStore for YamlProfileStore {
    fn store(&self, record: &ProfileRecord) -> Result<(), RecordError> {
        let contents = serde_yaml::to_string(record).map_err(|source| RecordError::Yaml {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, contents).map_err(|source| RecordError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), "Saved profile");
        Ok(())
    }
}
