//! Wrapping an assertion into a nanopublication.
//!
//! The document is written in TriG with the four standard named graphs. Blank
//! nodes are mapped into the temporary nanopub namespace; the server assigns
//! the final URI on publication.

use chrono::{DateTime, SecondsFormat, Utc};
use nanokey_core::ValidatedOrcid;
use nanokey_identity::assertion::{Iri, Term, Triple};
use nanokey_identity::{AssertionGraph, BlankNode};

/// The temporary nanopublication URI.
pub const TEMP_NANOPUB: &str = "http://purl.org/nanopub/temp/mynanopub";

/// Base for blank nodes and graph names inside the temporary nanopublication.
pub const TEMP_NAMESPACE: &str = "http://purl.org/nanopub/temp/mynanopub#";

const NP_NANOPUBLICATION: &str = "http://www.nanopub.org/nschema#Nanopublication";
const NP_HAS_ASSERTION: &str = "http://www.nanopub.org/nschema#hasAssertion";
const NP_HAS_PROVENANCE: &str = "http://www.nanopub.org/nschema#hasProvenance";
const NP_HAS_PUBINFO: &str = "http://www.nanopub.org/nschema#hasPublicationInfo";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const PROV_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";
const PROV_GENERATED_AT: &str = "http://www.w3.org/ns/prov#generatedAtTime";
const NPX_INTRODUCES: &str = "http://purl.org/nanopub/x/introduces";
const DCT_CREATED: &str = "http://purl.org/dc/terms/created";
const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// A nanopublication ready to be serialized.
#[derive(Debug, Clone)]
pub struct Nanopub<'a> {
    assertion: &'a AssertionGraph,
    concept: &'a BlankNode,
    author: Option<&'a ValidatedOrcid>,
    attributed_to: Option<&'a ValidatedOrcid>,
    created: DateTime<Utc>,
}

impl<'a> Nanopub<'a> {
    /// Wraps `assertion`, declaring that it introduces `concept`.
    #[must_use]
    pub fn from_assertion(assertion: &'a AssertionGraph, concept: &'a BlankNode) -> Self {
        Self {
            assertion,
            concept,
            author: None,
            attributed_to: None,
            created: Utc::now(),
        }
    }

    /// Sets the creator of the nanopublication.
    #[must_use]
    pub fn author(mut self, author: Option<&'a ValidatedOrcid>) -> Self {
        self.author = author;
        self
    }

    /// Sets who the assertion is attributed to.
    #[must_use]
    pub fn attributed_to(mut self, attributed_to: Option<&'a ValidatedOrcid>) -> Self {
        self.attributed_to = attributed_to;
        self
    }

    /// Overrides the creation time.
    #[must_use]
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// Returns the temporary URI of the introduced concept.
    #[must_use]
    pub fn temp_concept_uri(&self) -> String {
        format!("{TEMP_NAMESPACE}{}", self.concept.label())
    }

    /// Serializes the nanopublication as TriG.
    #[must_use]
    pub fn to_trig(&self) -> String {
        let this = Term::Iri(Iri::new(TEMP_NANOPUB));
        let graph = |name: &str| Term::Iri(Iri::new(format!("{TEMP_NAMESPACE}{name}")));
        let (head, assertion, provenance, pubinfo) = (
            graph("Head"),
            graph("assertion"),
            graph("provenance"),
            graph("pubinfo"),
        );

        let head_triples = vec![
            Triple::new(this.clone(), RDF_TYPE, Term::Iri(Iri::new(NP_NANOPUBLICATION))),
            Triple::new(this.clone(), NP_HAS_ASSERTION, assertion.clone()),
            Triple::new(this.clone(), NP_HAS_PROVENANCE, provenance.clone()),
            Triple::new(this.clone(), NP_HAS_PUBINFO, pubinfo.clone()),
        ];

        let assertion_triples: Vec<Triple> = self
            .assertion
            .iter()
            .map(|t| t.skolemize(TEMP_NAMESPACE))
            .collect();

        let mut provenance_triples = Vec::new();
        if let Some(who) = self.attributed_to {
            provenance_triples.push(Triple::new(
                assertion.clone(),
                PROV_ATTRIBUTED_TO,
                orcid_term(who),
            ));
        }

        let mut pubinfo_triples = vec![Triple::new(
            this.clone(),
            NPX_INTRODUCES,
            Term::Iri(Iri::new(self.temp_concept_uri())),
        )];
        if let Some(author) = self.author {
            pubinfo_triples.push(Triple::new(this.clone(), PROV_ATTRIBUTED_TO, orcid_term(author)));
        }

        let timestamp = format!(
            "\"{}\"^^<{XSD_DATETIME}>",
            self.created.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        let generated = format!("{assertion} <{PROV_GENERATED_AT}> {timestamp} .");
        let created = format!("{this} <{DCT_CREATED}> {timestamp} .");

        let mut out = String::new();
        write_graph(&mut out, &head, lines(&head_triples));
        write_graph(&mut out, &assertion, lines(&assertion_triples));
        write_graph(
            &mut out,
            &provenance,
            lines(&provenance_triples).chain(std::iter::once(generated)),
        );
        write_graph(
            &mut out,
            &pubinfo,
            lines(&pubinfo_triples).chain(std::iter::once(created)),
        );
        out
    }
}

fn orcid_term(orcid: &ValidatedOrcid) -> Term {
    Term::Iri(Iri::new(orcid.as_str()))
}

fn lines(triples: &[Triple]) -> impl Iterator<Item = String> + '_ {
    triples.iter().map(ToString::to_string)
}

fn write_graph(out: &mut String, name: &Term, lines: impl Iterator<Item = String>) {
    out.push_str(&format!("{name} {{\n"));
    for line in lines {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str("}\n");
}
