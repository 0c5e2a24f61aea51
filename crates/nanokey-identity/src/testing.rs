//! Deterministic key providers for tests.

use crate::error::ProviderError;
use crate::{KeyPaths, KeyProvider};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Mode {
    Complete,
    PublicOnly,
    EmptyPublic,
    FailAfterPrivate,
}

/// A [`KeyProvider`] writing fixed dummy key text.
///
/// The n-th successful call writes `fake-public-key-n` and
/// `fake-private-key-n`, so regeneration is observable. Clones share the call
/// counter.
#[derive(Debug, Clone)]
pub struct FakeKeyProvider {
    mode: Mode,
    calls: Arc<AtomicUsize>,
}

impl FakeKeyProvider {
    /// A provider that always writes a complete pair.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(Mode::Complete)
    }

    /// A provider that reports success but writes only the public key.
    #[must_use]
    pub fn partial() -> Self {
        Self::with_mode(Mode::PublicOnly)
    }

    /// A provider that reports success but leaves the public key empty.
    #[must_use]
    pub fn empty_public() -> Self {
        Self::with_mode(Mode::EmptyPublic)
    }

    /// A provider that writes the private key and then fails.
    #[must_use]
    pub fn failing() -> Self {
        Self::with_mode(Mode::FailAfterPrivate)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns how many times `generate` has been called.
    #[must_use]
    pub fn generated(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyProvider for FakeKeyProvider {
    fn generate(&self, paths: &KeyPaths) -> Result<(), ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.mode {
            Mode::Complete => {
                fs::write(&paths.private, format!("fake-private-key-{n}"))?;
                fs::write(&paths.public, format!("fake-public-key-{n}"))?;
                Ok(())
            }
            Mode::PublicOnly => {
                fs::write(&paths.public, format!("fake-public-key-{n}"))?;
                Ok(())
            }
            Mode::EmptyPublic => {
                fs::write(&paths.private, format!("fake-private-key-{n}"))?;
                fs::write(&paths.public, "")?;
                Ok(())
            }
            Mode::FailAfterPrivate => {
                fs::write(&paths.private, format!("fake-private-key-{n}"))?;
                Err(ProviderError::Generation("simulated failure".to_string()))
            }
        }
    }
}
