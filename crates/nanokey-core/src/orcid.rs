//! ORCID iD validation.
//!
//! An ORCID iD is accepted only in its full URL form,
//! `https://orcid.org/0000-0000-0000-0000`. Holding a [`ValidatedOrcid`]
//! proves the string passed [`validate`].

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The pattern an ORCID iD must match, as reported in validation errors.
pub const ORCID_PATTERN: &str = r"^https://orcid.org/(\d{4}-){3}\d{4}$";

/// URL prefix shared by every ORCID iD.
pub const ORCID_PREFIX: &str = "https://orcid.org/";

/// ASCII digits only, and a literal dot in the host.
static ORCID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://orcid\.org/([0-9]{4}-){3}[0-9]{4}$").expect("Invalid regex")
});

/// An ORCID iD that has passed validation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidatedOrcid(String);

impl ValidatedOrcid {
    /// Returns the full identifier URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the sixteen-digit path, e.g. `0000-0001-2345-6789`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0[ORCID_PREFIX.len()..]
    }

    /// Consumes the identifier, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validates an optional ORCID iD.
///
/// Absent and empty input both mean "no ORCID linkage" and yield `Ok(None)`.
/// Matching input is returned unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifierFormat`] for any other non-empty input.
pub fn validate(candidate: Option<&str>) -> Result<Option<ValidatedOrcid>> {
    match candidate {
        None | Some("") => Ok(None),
        Some(value) if ORCID_REGEX.is_match(value) => Ok(Some(ValidatedOrcid(value.to_owned()))),
        Some(value) => Err(Error::invalid_identifier(value)),
    }
}

impl FromStr for ValidatedOrcid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        validate(Some(s))?.ok_or_else(|| Error::invalid_identifier(s))
    }
}

impl TryFrom<String> for ValidatedOrcid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        if ORCID_REGEX.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(Error::invalid_identifier(value))
        }
    }
}

impl From<ValidatedOrcid> for String {
    fn from(orcid: ValidatedOrcid) -> Self {
        orcid.0
    }
}

impl AsRef<str> for ValidatedOrcid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ValidatedOrcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatedOrcid({})", self.path())
    }
}

impl fmt::Display for ValidatedOrcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
