//! Key generation.
//!
//! The [`KeyStore`](crate::KeyStore) never creates key material itself; it asks
//! a [`KeyProvider`] to write a fresh pair at the store's fixed paths.

use crate::error::ProviderError;
use crate::KeyPaths;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Writes a fresh keypair at the given paths.
///
/// Implementations should leave either both files or neither; the store
/// verifies the result regardless.
pub trait KeyProvider {
    /// Generates a keypair, writing both files.
    ///
    /// # Errors
    ///
    /// Returns an error if generation or writing fails.
    fn generate(&self, paths: &KeyPaths) -> Result<(), ProviderError>;
}

/// Generates RSA keys in the nanopub key file layout.
///
/// The private key is base64 encoded PKCS#8 DER and the public key is base64
/// encoded SubjectPublicKeyInfo DER, both without PEM armor.
#[derive(Debug, Clone, Copy)]
pub struct RsaKeyProvider {
    bits: usize,
}

impl RsaKeyProvider {
    /// Default modulus size in bits.
    pub const DEFAULT_BITS: usize = 2048;

    /// Creates a provider producing keys of `bits` modulus size.
    #[must_use]
    pub const fn new(bits: usize) -> Self {
        Self { bits }
    }

    /// Returns the configured modulus size.
    #[must_use]
    pub const fn bits(&self) -> usize {
        self.bits
    }
}

impl Default for RsaKeyProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BITS)
    }
}

impl KeyProvider for RsaKeyProvider {
    fn generate(&self, paths: &KeyPaths) -> Result<(), ProviderError> {
        tracing::debug!(bits = self.bits, "Generating RSA keypair");

        let private = RsaPrivateKey::new(&mut OsRng, self.bits)
            .map_err(|e| ProviderError::Generation(e.to_string()))?;
        let public = RsaPublicKey::from(&private);

        let private_der = private
            .to_pkcs8_der()
            .map_err(|e| ProviderError::Encoding(e.to_string()))?;
        let public_der = public
            .to_public_key_der()
            .map_err(|e| ProviderError::Encoding(e.to_string()))?;

        let private_text = Zeroizing::new(STANDARD.encode(private_der.as_bytes()));
        let public_text = STANDARD.encode(public_der.as_bytes());

        write_replacing(&paths.private, private_text.as_bytes(), true)?;
        write_replacing(&paths.public, public_text.as_bytes(), false)?;

        Ok(())
    }
}

/// Writes `contents` next to `path` and renames it into place.
fn write_replacing(path: &Path, contents: &[u8], secret: bool) -> io::Result<()> {
    let staging = stage(path, contents, secret)?;
    fs::rename(&staging, path).inspect_err(|_| discard(&staging))
}

/// Writes `contents` to a hidden staging file beside `path` and returns its
/// location. Nothing is left behind on error.
pub(crate) fn stage(path: &Path, contents: &[u8], secret: bool) -> io::Result<PathBuf> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.with_file_name(format!(".{file_name}.tmp"));

    let result = (|| {
        let mut file = fs::File::create(&staging)?;
        if secret {
            restrict_permissions(&file)?;
        }
        file.write_all(contents)?;
        file.sync_all()
    })();

    match result {
        Ok(()) => Ok(staging),
        Err(e) => {
            discard(&staging);
            Err(e)
        }
    }
}

/// Removes a staging file, ignoring errors.
pub(crate) fn discard(staging: &Path) {
    if let Err(e) = fs::remove_file(staging) {
        tracing::debug!(path = %staging.display(), error = %e, "Staging file not removed");
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}
