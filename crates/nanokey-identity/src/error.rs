//! Error types for key lifecycle operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while managing the local keypair.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The configuration directory could not be created or accessed.
    #[error("cannot prepare configuration directory {}", path.display())]
    ConfigDir {
        /// The configuration directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A key file given for import is missing or unreadable.
    #[error("source key not found or unreadable: {}", path.display())]
    SourceKeyNotFound {
        /// The source path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Copying a key file into the configuration directory failed.
    #[error("cannot import key {} into {}", from.display(), to.display())]
    KeyImportFailed {
        /// The source file.
        from: PathBuf,
        /// The destination file.
        to: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The key provider failed, or did not leave a complete pair behind.
    #[error("key generation failed in {}: {reason}", dir.display())]
    KeyGenerationFailed {
        /// The directory keys were generated into.
        dir: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A key file exists but could not be removed.
    #[error("cannot delete key file {}", path.display())]
    KeyDeletionFailed {
        /// The file that could not be removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The public key file is absent, unreadable or empty.
    #[error("public key unreadable at {}: {reason}", path.display())]
    PublicKeyUnreadable {
        /// The public key path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
}

/// Errors reported by a [`KeyProvider`](crate::KeyProvider).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Writing key material failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key generator itself failed.
    #[error("key generation: {0}")]
    Generation(String),

    /// Key material could not be encoded.
    #[error("key encoding: {0}")]
    Encoding(String),
}

/// A specialized Result type for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;
