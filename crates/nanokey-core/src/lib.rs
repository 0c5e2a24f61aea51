//! # Nanokey Core
//!
//! Core error types and identifier validation shared by the nanokey crates.
//!
//! ## Features
//!
//! - ORCID iD validation ([`orcid::validate`], [`ValidatedOrcid`])
//! - Error types with the offending input attached
//!
//! ## Example
//!
//! ```rust
//! use nanokey_core::orcid;
//!
//! let id = orcid::validate(Some("https://orcid.org/0000-0001-2345-6789"))?;
//! assert!(id.is_some());
//!
//! // Leaving the identifier out is not an error.
//! assert!(orcid::validate(Some(""))?.is_none());
//! # Ok::<(), nanokey_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod orcid;

pub use error::{Error, Result};
pub use orcid::ValidatedOrcid;
