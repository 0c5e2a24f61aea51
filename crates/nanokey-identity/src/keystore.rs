//! The on-disk keypair in the configuration directory.

use crate::error::{IdentityError, Result};
use crate::provider::{discard, stage};
use crate::{KeyAlgorithm, KeyPair, KeyPaths, KeyPresence, KeyProvider};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Manages the public and private key files in one configuration directory.
///
/// The directory is fixed at construction. There is no locking: two
/// processes generating or deleting keys in the same directory at the same
/// time can leave a mismatched pair.
pub struct KeyStore {
    dir: PathBuf,
    paths: KeyPaths,
    provider: Box<dyn KeyProvider>,
}

impl KeyStore {
    /// Creates a store for `dir`, generating keys through `provider`.
    ///
    /// Nothing is touched on disk until an operation is called.
    pub fn new(dir: impl Into<PathBuf>, provider: Box<dyn KeyProvider>) -> Self {
        let dir = dir.into();
        let paths = KeyPaths::in_dir(&dir);
        Self {
            dir,
            paths,
            provider,
        }
    }

    /// Returns the configuration directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the fixed key paths.
    #[must_use]
    pub fn paths(&self) -> &KeyPaths {
        &self.paths
    }

    /// Creates the configuration directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::ConfigDir`] if the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.dir.is_dir() {
            tracing::info!(path = %self.dir.display(), "Creating configuration directory");
        }
        fs::create_dir_all(&self.dir).map_err(|source| IdentityError::ConfigDir {
            path: self.dir.clone(),
            source,
        })
    }

    /// Reports which key files are present.
    #[must_use]
    pub fn presence(&self) -> KeyPresence {
        KeyPresence::from_flags(self.paths.public.exists(), self.paths.private.exists())
    }

    /// Returns true if either key file is present.
    ///
    /// A lone public or private key counts: half a pair is never safe to
    /// treat as "no keys".
    #[must_use]
    pub fn exists(&self) -> bool {
        self.presence().any()
    }

    /// Generates a fresh keypair at the fixed paths.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyGenerationFailed`] if the provider fails or
    /// does not leave both files behind with a readable public key. Any
    /// partial output is removed first.
    pub fn generate(&self) -> Result<KeyPair> {
        tracing::info!(dir = %self.dir.display(), "Generating keypair");

        let failure = match self.provider.generate(&self.paths) {
            Ok(()) => match self.presence() {
                KeyPresence::Complete => self.read_public_key().err().map(|e| e.to_string()),
                KeyPresence::None => Some("provider wrote no key files".to_string()),
                KeyPresence::Partial { public, .. } => Some(format!(
                    "provider wrote only the {} key",
                    if public { "public" } else { "private" }
                )),
            },
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = failure {
            tracing::error!(dir = %self.dir.display(), %reason, "Key generation failed");
            self.discard_partial();
            return Err(IdentityError::KeyGenerationFailed {
                dir: self.dir.clone(),
                reason,
            });
        }

        self.keypair()
    }

    /// Copies an existing keypair into the configuration directory.
    ///
    /// Existing key files are overwritten. Both sources are read and both
    /// copies are staged before either key is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::SourceKeyNotFound`] if either source is not a
    /// readable regular file, or [`IdentityError::KeyImportFailed`] if the
    /// copies cannot be written.
    pub fn import_from(&self, public_src: &Path, private_src: &Path) -> Result<KeyPair> {
        let public = read_source(public_src)?;
        let private = Zeroizing::new(read_source(private_src)?);

        let staged_public = stage(&self.paths.public, &public, false)
            .map_err(import_error(public_src, &self.paths.public))?;
        let staged_private = stage(&self.paths.private, &private, true)
            .map_err(import_error(private_src, &self.paths.private))
            .inspect_err(|_| discard(&staged_public))?;

        fs::rename(&staged_public, &self.paths.public)
            .map_err(import_error(public_src, &self.paths.public))
            .inspect_err(|_| {
                discard(&staged_public);
                discard(&staged_private);
            })?;
        fs::rename(&staged_private, &self.paths.private)
            .map_err(import_error(private_src, &self.paths.private))
            .inspect_err(|_| discard(&staged_private))?;

        tracing::info!(
            public = %public_src.display(),
            private = %private_src.display(),
            dir = %self.dir.display(),
            "Imported keypair"
        );

        self.keypair()
    }

    /// Removes both key files.
    ///
    /// Missing files are not an error, so deleting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyDeletionFailed`] if a present file cannot be
    /// removed.
    pub fn delete(&self) -> Result<()> {
        for path in self.paths.both() {
            match fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed key file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(IdentityError::KeyDeletionFailed {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }

    /// Reads the public key text from the fixed public key path.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::PublicKeyUnreadable`] if the file is missing,
    /// unreadable, or empty.
    pub fn read_public_key(&self) -> Result<String> {
        let path = &self.paths.public;
        let text = fs::read_to_string(path).map_err(|e| IdentityError::PublicKeyUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        if text.trim().is_empty() {
            return Err(IdentityError::PublicKeyUnreadable {
                path: path.clone(),
                reason: "file is empty".to_string(),
            });
        }
        Ok(text)
    }

    /// Returns the stored keypair.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::PublicKeyUnreadable`] if the public key cannot
    /// be read.
    pub fn keypair(&self) -> Result<KeyPair> {
        Ok(KeyPair {
            algorithm: KeyAlgorithm::Rsa,
            public_key: self.read_public_key()?,
            public_key_path: self.paths.public.clone(),
            private_key_path: self.paths.private.clone(),
        })
    }

    fn discard_partial(&self) {
        if let Err(e) = self.delete() {
            tracing::warn!(error = %e, "Could not remove partial key files");
        }
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// Reads an import source, which must be a regular file.
fn read_source(path: &Path) -> Result<Vec<u8>> {
    let not_found = |source| IdentityError::SourceKeyNotFound {
        path: path.to_path_buf(),
        source,
    };

    if !fs::metadata(path).map_err(not_found)?.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    fs::read(path).map_err(not_found)
}

fn import_error<'a>(from: &'a Path, to: &'a Path) -> impl Fn(io::Error) -> IdentityError + 'a {
    move |source| IdentityError::KeyImportFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}
