//! # Nanokey Identity
//!
//! Local keypair management and identity assertions for nanopub users.
//!
//! ## Example
//!
//! ```rust
//! use nanokey_identity::{assertion, Identity};
//!
//! let identity = Identity::parse(Some("https://orcid.org/0000-0001-2345-6789"), "Jane Doe")?;
//!
//! // Bind a public key to the identity
//! let (graph, concept) = assertion::build(identity.orcid.as_ref(), "MIIBIjANBg...", &identity.name);
//! assert_eq!(graph.len(), 4);
//! assert_eq!(graph.key_declaration(), &concept);
//! # Ok::<(), nanokey_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assertion;
mod error;
mod keypair;
mod keystore;
mod provider;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use assertion::{AssertionGraph, BlankNode, Declarant};
pub use error::{IdentityError, ProviderError, Result};
pub use keypair::{KeyAlgorithm, KeyPair, KeyPaths, KeyPresence, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
pub use keystore::KeyStore;
pub use provider::{KeyProvider, RsaKeyProvider};

use nanokey_core::{orcid, ValidatedOrcid};

/// A user identity: an optional ORCID iD and a display name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Identity {
    /// The ORCID iD, if the user linked one.
    pub orcid: Option<ValidatedOrcid>,
    /// Full display name. Never empty.
    pub name: String,
}

impl Identity {
    /// Validates raw user input into an identity.
    ///
    /// An empty or absent ORCID iD yields an unlinked identity.
    ///
    /// # Errors
    ///
    /// Returns [`nanokey_core::Error::InvalidIdentifierFormat`] for a malformed
    /// ORCID iD, or [`nanokey_core::Error::InvalidInput`] for an empty name.
    pub fn parse(orcid_id: Option<&str>, name: &str) -> nanokey_core::Result<Self> {
        let orcid = orcid::validate(orcid_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(nanokey_core::Error::invalid_input("name", "cannot be empty"));
        }
        Ok(Self {
            orcid,
            name: name.to_string(),
        })
    }

    /// Returns true if the identity is linked to an ORCID iD.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.orcid.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identity_parse_linked() {
        let id = Identity::parse(Some("https://orcid.org/0000-0001-2345-6789"), " Jane Doe ").unwrap();
        assert!(id.is_linked());
        assert_eq!(id.name, "Jane Doe");
    }

    #[test]
    fn identity_parse_unlinked() {
        let id = Identity::parse(Some(""), "Jane Doe").unwrap();
        assert!(!id.is_linked());
    }

    #[test]
    fn identity_rejects_bad_input() {
        assert!(matches!(
            Identity::parse(Some("not-a-real-id"), "Jane"),
            Err(nanokey_core::Error::InvalidIdentifierFormat { .. })
        ));
        assert!(matches!(
            Identity::parse(None, "   "),
            Err(nanokey_core::Error::InvalidInput { field: "name", .. })
        ));
    }
}
