//! The identity assertion: four RDF triples binding a public key to an
//! ORCID iD and a name.
//!
//! ```text
//! K  npx:declaredBy    D
//! K  npx:hasAlgorithm  "RSA"
//! K  npx:hasPublicKey  "<public key>"
//! D  foaf:name         "<name>"
//! ```
//!
//! `K` is a fresh blank node per call. `D` is the ORCID iD when one is given,
//! otherwise a fresh blank node standing for an anonymous agent.

use crate::KeyAlgorithm;
use nanokey_core::ValidatedOrcid;
use std::fmt;
use uuid::Uuid;

/// Vocabulary used in identity assertions.
pub mod vocab {
    /// Nanopub extension namespace.
    pub const NPX: &str = "http://purl.org/nanopub/x/";
    /// `npx:declaredBy`
    pub const DECLARED_BY: &str = "http://purl.org/nanopub/x/declaredBy";
    /// `npx:hasAlgorithm`
    pub const HAS_ALGORITHM: &str = "http://purl.org/nanopub/x/hasAlgorithm";
    /// `npx:hasPublicKey`
    pub const HAS_PUBLIC_KEY: &str = "http://purl.org/nanopub/x/hasPublicKey";
    /// `foaf:name`
    pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
}

const KEY_DECLARATION_PREFIX: &str = "keyDeclaration";
const ANONYMOUS_AGENT_PREFIX: &str = "anonymousAgent";

/// A locally scoped node. Labels are unique per process run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode(String);

impl BlankNode {
    /// Creates a new blank node whose label starts with `prefix`.
    #[must_use]
    pub fn fresh(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", Uuid::new_v4().simple()))
    }

    /// Returns the node label, without the `_:` prefix.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Wraps an IRI string.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// A node or value in a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named resource.
    Iri(Iri),
    /// A locally scoped resource.
    Blank(BlankNode),
    /// A plain string literal.
    Literal(String),
}

impl Term {
    /// Returns the literal text, if this is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Replaces a blank node with an IRI under `base`, leaving other terms.
    #[must_use]
    pub fn skolemize(&self, base: &str) -> Self {
        match self {
            Self::Blank(node) => Self::Iri(Iri::new(format!("{base}{}", node.label()))),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Blank(node) => node.fmt(f),
            Self::Literal(text) => write_literal(f, text),
        }
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// A subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// The statement subject.
    pub subject: Term,
    /// The statement predicate.
    pub predicate: Iri,
    /// The statement object.
    pub object: Term,
}

impl Triple {
    /// Creates a triple.
    #[must_use]
    pub fn new(subject: Term, predicate: &str, object: Term) -> Self {
        Self {
            subject,
            predicate: Iri::new(predicate),
            object,
        }
    }

    /// Maps blank subject and object nodes to IRIs under `base`.
    #[must_use]
    pub fn skolemize(&self, base: &str) -> Self {
        Self {
            subject: self.subject.skolemize(base),
            predicate: self.predicate.clone(),
            object: self.object.skolemize(base),
        }
    }
}

/// Renders the triple as one N-Triples line, without the newline.
impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Who a key declaration is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declarant {
    /// The key belongs to this ORCID iD.
    Orcid(ValidatedOrcid),
    /// No identifier was given; a blank node stands for the named agent.
    Anonymous(BlankNode),
}

impl Declarant {
    /// Returns the node the declaration and the name are attached to.
    #[must_use]
    pub fn term(&self) -> Term {
        match self {
            Self::Orcid(orcid) => Term::Iri(Iri::new(orcid.as_str())),
            Self::Anonymous(node) => Term::Blank(node.clone()),
        }
    }

    /// Returns the ORCID iD, if the declaration is attributed to one.
    #[must_use]
    pub fn orcid(&self) -> Option<&ValidatedOrcid> {
        match self {
            Self::Orcid(orcid) => Some(orcid),
            Self::Anonymous(_) => None,
        }
    }
}

/// An immutable identity assertion graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionGraph {
    key_declaration: BlankNode,
    declarant: Declarant,
    triples: Vec<Triple>,
}

impl AssertionGraph {
    /// Returns the statements in construction order.
    #[must_use]
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Returns the number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns the key declaration node this assertion introduces.
    #[must_use]
    pub fn key_declaration(&self) -> &BlankNode {
        &self.key_declaration
    }

    /// Returns who the key is attributed to.
    #[must_use]
    pub fn declarant(&self) -> &Declarant {
        &self.declarant
    }

    /// Returns true if the graph contains `triple`.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Returns the object of the first statement matching subject and predicate.
    #[must_use]
    pub fn object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.triples
            .iter()
            .find(|t| &t.subject == subject && t.predicate.as_str() == predicate)
            .map(|t| &t.object)
    }

    /// Iterates over the statements.
    pub fn iter(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Renders the graph as N-Triples.
    #[must_use]
    pub fn to_ntriples(&self) -> String {
        self.triples.iter().map(|t| format!("{t}\n")).collect()
    }
}

impl<'a> IntoIterator for &'a AssertionGraph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

/// Builds the assertion that `public_key` belongs to `orcid` and `name`.
///
/// Returns the graph together with the key declaration node, the concept the
/// assertion introduces.
#[must_use]
pub fn build(
    orcid: Option<&ValidatedOrcid>,
    public_key: &str,
    name: &str,
) -> (AssertionGraph, BlankNode) {
    let key_declaration = BlankNode::fresh(KEY_DECLARATION_PREFIX);
    let declarant = match orcid {
        Some(orcid) => Declarant::Orcid(orcid.clone()),
        None => Declarant::Anonymous(BlankNode::fresh(ANONYMOUS_AGENT_PREFIX)),
    };

    let key = Term::Blank(key_declaration.clone());
    let agent = declarant.term();

    let triples = vec![
        Triple::new(key.clone(), vocab::DECLARED_BY, agent.clone()),
        Triple::new(
            key.clone(),
            vocab::HAS_ALGORITHM,
            Term::Literal(KeyAlgorithm::Rsa.as_str().to_string()),
        ),
        Triple::new(key, vocab::HAS_PUBLIC_KEY, Term::Literal(public_key.to_string())),
        Triple::new(agent, vocab::FOAF_NAME, Term::Literal(name.to_string())),
    ];

    let graph = AssertionGraph {
        key_declaration: key_declaration.clone(),
        declarant,
        triples,
    };
    (graph, key_declaration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn orcid() -> ValidatedOrcid {
        "https://orcid.org/0000-0001-2345-6789".parse().unwrap()
    }

    #[test]
    fn build_with_orcid() {
        let orcid = orcid();
        let (graph, concept) = build(Some(&orcid), "PUBKEY", "Jane Doe");
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.key_declaration(), &concept);

        let key = Term::Blank(concept);
        let orcid_node = Term::Iri(Iri::new("https://orcid.org/0000-0001-2345-6789"));

        assert!(graph.contains(&Triple::new(key.clone(), vocab::DECLARED_BY, orcid_node.clone())));
        assert_eq!(
            graph.object(&key, vocab::HAS_ALGORITHM),
            Some(&Term::Literal("RSA".into()))
        );
        assert_eq!(
            graph.object(&key, vocab::HAS_PUBLIC_KEY),
            Some(&Term::Literal("PUBKEY".into()))
        );
        assert_eq!(
            graph.object(&orcid_node, vocab::FOAF_NAME),
            Some(&Term::Literal("Jane Doe".into()))
        );
        assert_eq!(graph.declarant().orcid(), Some(&orcid));
    }

    #[test]
    fn build_anonymous_still_four_statements() {
        let (graph, concept) = build(None, "PUBKEY", "Jane Doe");
        assert_eq!(graph.len(), 4);

        let Declarant::Anonymous(agent) = graph.declarant() else {
            panic!("expected an anonymous declarant");
        };
        assert_ne!(agent, &concept);

        let key = Term::Blank(concept);
        let agent = Term::Blank(agent.clone());
        assert_eq!(graph.object(&key, vocab::DECLARED_BY), Some(&agent));
        assert_eq!(
            graph.object(&agent, vocab::FOAF_NAME).and_then(Term::as_literal),
            Some("Jane Doe")
        );
        assert!(graph
            .iter()
            .all(|t| !matches!(&t.object, Term::Iri(iri) if iri.as_str().contains("orcid"))));
    }

    #[test]
    fn key_declaration_is_fresh_per_call() {
        let orcid = orcid();
        let (a, ka) = build(Some(&orcid), "PUBKEY", "Jane Doe");
        let (b, kb) = build(Some(&orcid), "PUBKEY", "Jane Doe");
        assert_ne!(ka, kb);
        assert_ne!(a, b);
        assert!(ka.label().starts_with("keyDeclaration-"));
    }

    #[test]
    fn public_key_kept_verbatim() {
        let key = "-----BEGIN PUBLIC KEY-----\nMIIB\"x\\\n-----END PUBLIC KEY-----\n";
        let (graph, concept) = build(None, key, "A");
        assert_eq!(
            graph
                .object(&Term::Blank(concept), vocab::HAS_PUBLIC_KEY)
                .and_then(Term::as_literal),
            Some(key)
        );
    }

    #[test]
    fn ntriples_escape_literals() {
        let triple = Triple::new(
            Term::Iri(Iri::new("https://orcid.org/0000-0001-2345-6789")),
            vocab::FOAF_NAME,
            Term::Literal("Jane \"JD\" Doe\\\n".into()),
        );
        assert_eq!(
            triple.to_string(),
            "<https://orcid.org/0000-0001-2345-6789> <http://xmlns.com/foaf/0.1/name> \
             \"Jane \\\"JD\\\" Doe\\\\\\n\" ."
        );
    }

    #[test]
    fn skolemize_maps_only_blank_nodes() {
        let (graph, concept) = build(None, "PUBKEY", "A");
        let base = "http://purl.org/nanopub/temp/mynanopub#";
        let first = graph.triples()[0].skolemize(base);

        assert_eq!(
            first.subject,
            Term::Iri(Iri::new(format!("{base}{}", concept.label())))
        );
        assert!(matches!(first.object, Term::Iri(_)));
        let literal = graph.triples()[1].skolemize(base);
        assert_eq!(literal.object, Term::Literal("RSA".into()));
    }

    #[test]
    fn ntriples_has_one_line_per_statement() {
        let (graph, _) = build(Some(&orcid()), "PUBKEY", "Jane Doe");
        let text = graph.to_ntriples();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().all(|l| l.ends_with(" .")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every assertion has exactly four statements, whatever the input
        #[test]
        fn prop_always_four_statements(
            key in ".*",
            name in ".+",
            digits in proptest::option::of("[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}"),
        ) {
            let orcid = digits.map(|d| format!("https://orcid.org/{d}").parse::<ValidatedOrcid>().unwrap());
            let (graph, concept) = build(orcid.as_ref(), &key, &name);
            prop_assert_eq!(graph.len(), 4);
            let key_term = Term::Blank(concept);
            prop_assert_eq!(graph.iter().filter(|t| t.subject == key_term).count(), 3);
        }

        /// Property: a rendered line never contains a raw newline
        #[test]
        fn prop_ntriples_single_line(name in ".*") {
            let (graph, _) = build(None, "k", &name);
            prop_assert_eq!(graph.to_ntriples().lines().count(), 4);
        }
    }
}
