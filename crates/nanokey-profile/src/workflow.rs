//! The profile setup workflow.
//!
//! A run moves through a fixed sequence of steps and aborts on the first
//! error:
//!
//! ```text
//! validate -> ensure config dir -> resolve keypair -> read public key
//!          -> publish (optional) -> persist record
//! ```
//!
//! Input is validated before the filesystem is touched, and nothing is
//! persisted unless every earlier step succeeded.

use crate::error::{PromptError, Result, WorkflowError};
use crate::publish::{Published, Publisher};
use crate::record::{ProfileRecord, ProfileStore};
use nanokey_identity::{assertion, AssertionGraph, Identity, KeyPresence, KeyStore};
use std::path::{Path, PathBuf};

/// Asks whether an existing keypair may be replaced.
pub trait Confirm {
    /// Returns true if the keypair in `dir` may be deleted and regenerated.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer could be obtained.
    fn confirm_overwrite(&self, dir: &Path) -> std::result::Result<bool, PromptError>;
}

/// A fixed answer, for non-interactive runs.
impl Confirm for bool {
    fn confirm_overwrite(&self, _dir: &Path) -> std::result::Result<bool, PromptError> {
        Ok(*self)
    }
}

/// How the keypair for a run is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResolution {
    /// Copy a user-supplied keypair into the configuration directory.
    Import,
    /// No keys exist; generate a fresh pair.
    Generate,
    /// Keep the existing pair untouched.
    Reuse,
    /// Delete the existing keys and generate a fresh pair.
    Regenerate,
}

impl KeyResolution {
    /// Decides how to obtain keys.
    ///
    /// `overwrite` is only consulted for a complete existing pair. A partial
    /// pair is always regenerated.
    ///
    /// # Errors
    ///
    /// Propagates the error of `overwrite`.
    pub fn decide<E>(
        importing: bool,
        presence: KeyPresence,
        overwrite: impl FnOnce() -> std::result::Result<bool, E>,
    ) -> std::result::Result<Self, E> {
        if importing {
            return Ok(Self::Import);
        }
        match presence {
            KeyPresence::None => Ok(Self::Generate),
            KeyPresence::Partial { .. } => Ok(Self::Regenerate),
            KeyPresence::Complete => {
                if overwrite()? {
                    Ok(Self::Regenerate)
                } else {
                    Ok(Self::Reuse)
                }
            }
        }
    }

    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Generate => "generate",
            Self::Reuse => "reuse",
            Self::Regenerate => "regenerate",
        }
    }
}

impl std::fmt::Display for KeyResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw input for a setup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRequest {
    /// Full name of the user.
    pub name: String,
    /// ORCID iD as typed by the user; empty or absent means unlinked.
    pub orcid_id: Option<String>,
    /// An existing keypair to import, as `(public, private)`.
    pub keypair: Option<(PathBuf, PathBuf)>,
    /// Whether to publish the profile.
    pub publish: bool,
}

/// The result of a successful run.
#[derive(Debug, Clone)]
pub struct ProfileOutcome {
    /// The record that was persisted.
    pub record: ProfileRecord,
    /// How the keypair was obtained.
    pub resolution: KeyResolution,
    /// The assertion, if the profile was published.
    pub assertion: Option<AssertionGraph>,
    /// Where the profile was published.
    pub published: Option<Published>,
}

/// Runs profile setup against injected collaborators.
pub struct ProfileWorkflow<'a> {
    keystore: &'a KeyStore,
    publisher: &'a dyn Publisher,
    store: &'a dyn ProfileStore,
    confirm: &'a dyn Confirm,
}

impl<'a> ProfileWorkflow<'a> {
    /// Creates a workflow.
    pub fn new(
        keystore: &'a KeyStore,
        publisher: &'a dyn Publisher,
        store: &'a dyn ProfileStore,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            keystore,
            publisher,
            store,
            confirm,
        }
    }

    /// Runs setup for `request`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step. If publishing fails, no
    /// record is persisted.
    pub fn run(&self, request: &ProfileRequest) -> Result<ProfileOutcome> {
        let identity = Identity::parse(request.orcid_id.as_deref(), &request.name)?;
        tracing::info!(
            name = %identity.name,
            orcid = identity.orcid.as_ref().map_or("none", |o| o.as_str()),
            "Setting up profile"
        );

        self.keystore.ensure_dir()?;
        let resolution = self.resolve_keys(request.keypair.as_ref())?;
        let public_key = self.keystore.read_public_key()?;

        let (assertion, published) = if request.publish {
            let orcid = identity.orcid.as_ref();
            let (graph, concept) = assertion::build(orcid, &public_key, &identity.name);
            let published = self.publisher.publish(&graph, &concept, orcid, orcid)?;
            (Some(graph), Some(published))
        } else {
            tracing::debug!("Publishing not requested");
            (None, None)
        };

        let paths = self.keystore.paths();
        let record = ProfileRecord {
            orcid_id: identity.orcid,
            name: identity.name,
            public_key_path: paths.public.clone(),
            private_key_path: paths.private.clone(),
            published_uri: published.as_ref().map(|p| p.concept_uri.clone()),
        };
        self.store.store(&record)?;

        tracing::info!(%resolution, published = record.is_published(), "Profile setup complete");
        Ok(ProfileOutcome {
            record,
            resolution,
            assertion,
            published,
        })
    }

    fn resolve_keys(&self, import: Option<&(PathBuf, PathBuf)>) -> Result<KeyResolution> {
        let presence = self.keystore.presence();
        let resolution = KeyResolution::decide(import.is_some(), presence, || {
            self.confirm.confirm_overwrite(self.keystore.dir())
        })
        .map_err(WorkflowError::Prompt)?;

        match (resolution, import) {
            (KeyResolution::Import, Some((public, private))) => {
                self.keystore.import_from(public, private)?;
            }
            (KeyResolution::Generate, _) => {
                self.keystore.generate()?;
            }
            (KeyResolution::Regenerate, _) => {
                if let KeyPresence::Partial { public, private } = presence {
                    tracing::warn!(
                        dir = %self.keystore.dir().display(),
                        public,
                        private,
                        "Incomplete keypair found, regenerating"
                    );
                }
                self.keystore.delete()?;
                self.keystore.generate()?;
            }
            (KeyResolution::Reuse, _) | (KeyResolution::Import, None) => {
                tracing::info!(dir = %self.keystore.dir().display(), "Keeping existing keypair");
            }
        }
        Ok(resolution)
    }
}
