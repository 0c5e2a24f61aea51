//! Fuzz target for assertion and nanopublication rendering.
//!
//! Arbitrary names and key text must never break a statement across lines.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nanokey_identity::assertion;
use nanokey_profile::nanopub::Nanopub;

#[derive(Debug, Arbitrary)]
struct Input {
    public_key: String,
    name: String,
}

fuzz_target!(|input: Input| {
    let (graph, concept) = assertion::build(None, &input.public_key, &input.name);
    assert_eq!(graph.len(), 4);

    let ntriples = graph.to_ntriples();
    assert_eq!(ntriples.lines().count(), 4);
    assert!(ntriples.lines().all(|line| line.ends_with(" .")));

    let trig = Nanopub::from_assertion(&graph, &concept).to_trig();
    assert!(trig.lines().all(|line| line.ends_with(" .") || line.ends_with('{') || line == "}"));
});
