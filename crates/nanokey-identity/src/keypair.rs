//! Keypair locations and state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the private key inside the configuration directory.
pub const PRIVATE_KEY_FILE: &str = "id_rsa";

/// File name of the public key inside the configuration directory.
pub const PUBLIC_KEY_FILE: &str = "id_rsa.pub";

/// Signature algorithm of a keypair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyAlgorithm {
    /// RSA, the only algorithm nanopub key declarations use.
    #[default]
    Rsa,
}

impl KeyAlgorithm {
    /// Returns the name used in key declarations.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed public and private key paths inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    /// Path of the public key file.
    pub public: PathBuf,
    /// Path of the private key file.
    pub private: PathBuf,
}

impl KeyPaths {
    /// Returns the key paths inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            public: dir.join(PUBLIC_KEY_FILE),
            private: dir.join(PRIVATE_KEY_FILE),
        }
    }

    /// Returns both paths, public first.
    #[must_use]
    pub fn both(&self) -> [&Path; 2] {
        [self.public.as_path(), self.private.as_path()]
    }
}

/// Which key files are present on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPresence {
    /// Neither file exists.
    None,
    /// Exactly one of the two files exists.
    Partial {
        /// Whether the public key file exists.
        public: bool,
        /// Whether the private key file exists.
        private: bool,
    },
    /// Both files exist.
    Complete,
}

impl KeyPresence {
    /// Classifies presence from the two file checks.
    #[must_use]
    pub const fn from_flags(public: bool, private: bool) -> Self {
        match (public, private) {
            (false, false) => Self::None,
            (true, true) => Self::Complete,
            (public, private) => Self::Partial { public, private },
        }
    }

    /// Returns true if at least one key file exists.
    #[must_use]
    pub const fn any(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A keypair stored in the configuration directory.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// The key algorithm.
    pub algorithm: KeyAlgorithm,
    /// The public key text, as stored in the public key file.
    pub public_key: String,
    /// Where the public key lives.
    pub public_key_path: PathBuf,
    /// Where the private key lives.
    pub private_key_path: PathBuf,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm)
            .field("public_key_len", &self.public_key.len())
            .field("public_key_path", &self.public_key_path)
            .field("private_key_path", &self.private_key_path)
            .finish()
    }
}
