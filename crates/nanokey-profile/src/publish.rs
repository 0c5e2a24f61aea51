//! Publishing identity assertions to a nanopub server.

use crate::error::PublishError;
use crate::nanopub::Nanopub;
use nanokey_core::ValidatedOrcid;
use nanokey_identity::{AssertionGraph, BlankNode};
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use std::time::Duration;

/// The result of a successful publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// URI of the published nanopublication.
    pub nanopub_uri: String,
    /// URI of the concept the assertion introduced.
    pub concept_uri: String,
}

/// Publishes assertions to the network.
pub trait Publisher {
    /// Publishes `assertion`, which introduces `concept`, on behalf of
    /// `author` and attributed to `attributed_to`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the network confirmed the publication.
    fn publish(
        &self,
        assertion: &AssertionGraph,
        concept: &BlankNode,
        author: Option<&ValidatedOrcid>,
        attributed_to: Option<&ValidatedOrcid>,
    ) -> Result<Published, PublishError>;
}

/// Posts nanopublications as TriG to a nanopub server.
///
/// The server answers with the URI of the stored nanopublication, either in
/// the `Location` header or as the response body.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    url: String,
    client: Client,
}

impl HttpPublisher {
    /// Content type of the request body.
    pub const CONTENT_TYPE: &'static str = "application/trig";

    /// Creates a publisher for the server at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Client`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PublishError> {
        let client = Client::builder()
            .user_agent(concat!("nanokey/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(PublishError::Client)?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Returns the server URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn network_error(&self, source: reqwest::Error) -> PublishError {
        PublishError::Network {
            url: self.url.clone(),
            source,
        }
    }
}

impl Publisher for HttpPublisher {
    fn publish(
        &self,
        assertion: &AssertionGraph,
        concept: &BlankNode,
        author: Option<&ValidatedOrcid>,
        attributed_to: Option<&ValidatedOrcid>,
    ) -> Result<Published, PublishError> {
        let body = Nanopub::from_assertion(assertion, concept)
            .author(author)
            .attributed_to(attributed_to)
            .to_trig();

        tracing::info!(url = %self.url, bytes = body.len(), "Publishing nanopublication");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, Self::CONTENT_TYPE)
            .body(body)
            .send()
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().map_err(|e| self.network_error(e))?;

        if !status.is_success() {
            return Err(PublishError::Rejected {
                url: self.url.clone(),
                status: status.as_u16(),
                body: text,
            });
        }

        let nanopub_uri = location
            .or_else(|| Some(text.trim().to_owned()).filter(|t| !t.is_empty()))
            .ok_or_else(|| PublishError::MissingUri {
                url: self.url.clone(),
            })?;
        let concept_uri = concept_uri(&nanopub_uri, concept);

        tracing::info!(%nanopub_uri, %concept_uri, "Published nanopublication");
        Ok(Published {
            nanopub_uri,
            concept_uri,
        })
    }
}

/// The concept URI inside a published nanopublication.
fn concept_uri(nanopub_uri: &str, concept: &BlankNode) -> String {
    let base = nanopub_uri.trim_end_matches(['#', '/']);
    format!("{base}#{}", concept.label())
}
