//! Error types for nanokey core operations.

use thiserror::Error;

/// The main error type for nanokey core operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An identifier did not match the ORCID iD syntax.
    #[error("invalid ORCID iD '{value}': expected an identifier matching {expected}")]
    InvalidIdentifierFormat {
        /// The rejected input, as given.
        value: String,
        /// The pattern the input was checked against.
        expected: &'static str,
    },

    /// The provided input was invalid.
    #[error("invalid input: {field} - {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: &'static str,
        /// A description of why the input was invalid.
        message: String,
    },
}

/// A specialized Result type for nanokey core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new invalid identifier error for the given input.
    #[must_use]
    pub fn invalid_identifier(value: impl Into<String>) -> Self {
        Self::InvalidIdentifierFormat {
            value: value.into(),
            expected: crate::orcid::ORCID_PATTERN,
        }
    }

    /// Creates a new invalid input error.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }
}
