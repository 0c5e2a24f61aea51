//! End-to-end tests of the profile setup workflow against a temporary
//! configuration directory.

use nanokey_core::ValidatedOrcid;
use nanokey_identity::assertion::{vocab, Iri, Term};
use nanokey_identity::testing::FakeKeyProvider;
use nanokey_identity::{AssertionGraph, BlankNode, IdentityError, KeyStore};
use nanokey_profile::{
    Confirm, KeyResolution, ProfileRecord, ProfileRequest, ProfileStore, ProfileWorkflow, PromptError,
    PublishError, Published, Publisher, RecordError, WorkflowError, YamlProfileStore,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ORCID: &str = "https://orcid.org/0000-0001-2345-6789";

/// Records every publish call and answers with a fixed URI, or fails.
#[derive(Default)]
struct RecordingPublisher {
    calls: RefCell<Vec<(AssertionGraph, Option<String>, Option<String>)>>,
    fail: bool,
}

impl RecordingPublisher {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(
        &self,
        assertion: &AssertionGraph,
        concept: &BlankNode,
        author: Option<&ValidatedOrcid>,
        attributed_to: Option<&ValidatedOrcid>,
    ) -> Result<Published, PublishError> {
        self.calls.borrow_mut().push((
            assertion.clone(),
            author.map(ToString::to_string),
            attributed_to.map(ToString::to_string),
        ));
        if self.fail {
            return Err(PublishError::Rejected {
                url: "http://np.test/".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(Published {
            nanopub_uri: "https://w3id.org/np/RAtest".to_string(),
            concept_uri: format!("https://w3id.org/np/RAtest#{}", concept.label()),
        })
    }
}

/// Keeps the last stored record in memory.
#[derive(Default)]
struct MemoryStore {
    record: RefCell<Option<ProfileRecord>>,
}

impl ProfileStore for MemoryStore {
    fn store(&self, record: &ProfileRecord) -> Result<(), RecordError> {
        *self.record.borrow_mut() = Some(record.clone());
        Ok(())
    }
}

/// Fails the test if the overwrite prompt is shown.
struct NeverAsked;

impl Confirm for NeverAsked {
    fn confirm_overwrite(&self, dir: &Path) -> Result<bool, PromptError> {
        panic!("unexpected overwrite prompt for {}", dir.display());
    }
}

struct Fixture {
    _tmp: TempDir,
    dir: PathBuf,
    provider: FakeKeyProvider,
    keystore: KeyStore,
}

impl Fixture {
    fn new() -> Self {
        Self::with_provider(FakeKeyProvider::new())
    }

    fn with_provider(provider: FakeKeyProvider) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nanopub");
        let keystore = KeyStore::new(&dir, Box::new(provider.clone()));
        Self {
            _tmp: tmp,
            dir,
            provider,
            keystore,
        }
    }

    fn run(
        &self,
        request: &ProfileRequest,
        publisher: &dyn Publisher,
        store: &dyn ProfileStore,
        overwrite: bool,
    ) -> nanokey_profile::Result<nanokey_profile::ProfileOutcome> {
        ProfileWorkflow::new(&self.keystore, publisher, store, &overwrite).run(request)
    }

    fn read(&self, file: &str) -> Vec<u8> {
        fs::read(self.dir.join(file)).unwrap()
    }
}

fn request(orcid_id: &str, publish: bool) -> ProfileRequest {
    ProfileRequest {
        name: "Jane Doe".to_string(),
        orcid_id: Some(orcid_id.to_string()),
        keypair: None,
        publish,
    }
}

#[test]
fn scenario_a_generate_and_publish() {
    let fx = Fixture::new();
    let publisher = RecordingPublisher::default();
    let store = MemoryStore::default();

    let outcome = fx.run(&request(ORCID, true), &publisher, &store, false).unwrap();

    assert_eq!(outcome.resolution, KeyResolution::Generate);
    assert_eq!(fx.provider.generated(), 1);
    assert!(fx.keystore.exists());

    let graph = outcome.assertion.unwrap();
    assert_eq!(graph.len(), 4);
    let orcid_node = Term::Iri(Iri::new(ORCID));
    assert_eq!(
        graph.object(&orcid_node, vocab::FOAF_NAME),
        Some(&Term::Literal("Jane Doe".to_string()))
    );
    assert_eq!(
        graph.object(&Term::Blank(graph.key_declaration().clone()), vocab::HAS_PUBLIC_KEY),
        Some(&Term::Literal("fake-public-key-1".to_string()))
    );

    let calls = publisher.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, graph);
    assert_eq!(calls[0].1.as_deref(), Some(ORCID));
    assert_eq!(calls[0].2.as_deref(), Some(ORCID));

    let record = store.record.borrow().clone().unwrap();
    let published = outcome.published.unwrap();
    assert_eq!(record.published_uri.as_deref(), Some(published.concept_uri.as_str()));
    assert_eq!(record.orcid_id.as_ref().map(ValidatedOrcid::as_str), Some(ORCID));
    assert_eq!(record.name, "Jane Doe");
    assert_eq!(record.public_key_path, fx.dir.join("id_rsa.pub"));
    assert_eq!(record.private_key_path, fx.dir.join("id_rsa"));
}

#[test]
fn scenario_b_unlinked_without_publishing() {
    let fx = Fixture::new();
    let publisher = RecordingPublisher::default();
    let store = MemoryStore::default();

    let outcome = fx.run(&request("", false), &publisher, &store, false).unwrap();

    assert_eq!(publisher.call_count(), 0);
    assert!(outcome.assertion.is_none());
    let record = store.record.borrow().clone().unwrap();
    assert!(record.orcid_id.is_none());
    assert!(record.published_uri.is_none());
}

#[test]
fn scenario_c_invalid_orcid_touches_nothing() {
    let fx = Fixture::new();
    let publisher = RecordingPublisher::default();
    let store = MemoryStore::default();

    let err = fx
        .run(&request("not-a-real-id", true), &publisher, &store, false)
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Input(nanokey_core::Error::InvalidIdentifierFormat { ref value, .. })
            if value == "not-a-real-id"
    ));
    assert_eq!(err.step(), "validate input");
    assert!(!fx.dir.exists());
    assert_eq!(fx.provider.generated(), 0);
    assert_eq!(publisher.call_count(), 0);
    assert!(store.record.borrow().is_none());
}

#[test]
fn blank_name_rejected() {
    let fx = Fixture::new();
    let store = MemoryStore::default();
    let mut req = request(ORCID, false);
    req.name = "   ".to_string();

    let err = fx
        .run(&req, &RecordingPublisher::default(), &store, false)
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Input(nanokey_core::Error::InvalidInput { field: "name", .. })
    ));
    assert!(!fx.dir.exists());
}

#[test]
fn declined_overwrite_keeps_keys() {
    let fx = Fixture::new();
    let store = MemoryStore::default();
    fx.run(&request(ORCID, false), &RecordingPublisher::default(), &store, false)
        .unwrap();
    let (public, private) = (fx.read("id_rsa.pub"), fx.read("id_rsa"));

    let outcome = fx
        .run(&request(ORCID, false), &RecordingPublisher::default(), &store, false)
        .unwrap();

    assert_eq!(outcome.resolution, KeyResolution::Reuse);
    assert_eq!(fx.provider.generated(), 1);
    assert_eq!(fx.read("id_rsa.pub"), public);
    assert_eq!(fx.read("id_rsa"), private);
}

#[test]
fn accepted_overwrite_regenerates() {
    let fx = Fixture::new();
    let store = MemoryStore::default();
    fx.run(&request(ORCID, false), &RecordingPublisher::default(), &store, false)
        .unwrap();

    let outcome = fx
        .run(&request(ORCID, false), &RecordingPublisher::default(), &store, true)
        .unwrap();

    assert_eq!(outcome.resolution, KeyResolution::Regenerate);
    assert_eq!(fx.read("id_rsa.pub"), b"fake-public-key-2");
}

#[test]
fn partial_pair_regenerated_without_prompt() {
    let fx = Fixture::new();
    fs::create_dir_all(&fx.dir).unwrap();
    fs::write(fx.dir.join("id_rsa.pub"), "orphan public key").unwrap();

    let outcome = ProfileWorkflow::new(
        &fx.keystore,
        &RecordingPublisher::default(),
        &MemoryStore::default(),
        &NeverAsked,
    )
    .run(&request(ORCID, false))
    .unwrap();

    assert_eq!(outcome.resolution, KeyResolution::Regenerate);
    assert_eq!(fx.read("id_rsa.pub"), b"fake-public-key-1");
    assert_eq!(fx.read("id_rsa"), b"fake-private-key-1");
}

#[test]
fn publish_failure_persists_nothing() {
    let fx = Fixture::new();
    let publisher = RecordingPublisher::failing();
    let store = YamlProfileStore::in_dir(&fx.dir);

    let err = fx.run(&request(ORCID, true), &publisher, &store, false).unwrap_err();

    assert!(matches!(err, WorkflowError::Publish(PublishError::Rejected { status: 503, .. })));
    assert_eq!(err.step(), "publish profile");
    assert_eq!(publisher.call_count(), 1);
    assert!(matches!(store.load(), Err(RecordError::NotFound { .. })));
}

#[test]
fn provider_failure_aborts_run() {
    let fx = Fixture::with_provider(FakeKeyProvider::failing());
    let store = MemoryStore::default();

    let err = fx
        .run(&request(ORCID, false), &RecordingPublisher::default(), &store, false)
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Key(IdentityError::KeyGenerationFailed { .. })));
    assert!(!fx.keystore.exists());
    assert!(store.record.borrow().is_none());
}

#[test]
fn import_external_keypair() {
    let fx = Fixture::new();
    let src = tempfile::tempdir().unwrap();
    let (public, private) = (src.path().join("my.pub"), src.path().join("my"));
    fs::write(&public, "imported-public").unwrap();
    fs::write(&private, "imported-private").unwrap();

    let mut req = request(ORCID, true);
    req.keypair = Some((public, private));
    let publisher = RecordingPublisher::default();
    let outcome = fx.run(&req, &publisher, &MemoryStore::default(), false).unwrap();

    assert_eq!(outcome.resolution, KeyResolution::Import);
    assert_eq!(fx.provider.generated(), 0);
    assert_eq!(fx.read("id_rsa.pub"), b"imported-public");
    assert_eq!(fx.read("id_rsa"), b"imported-private");

    let graph = outcome.assertion.unwrap();
    assert_eq!(
        graph.object(&Term::Blank(graph.key_declaration().clone()), vocab::HAS_PUBLIC_KEY),
        Some(&Term::Literal("imported-public".to_string()))
    );
}

#[test]
fn published_key_matches_file_exactly() {
    let fx = Fixture::new();
    let src = tempfile::tempdir().unwrap();
    let (public, private) = (src.path().join("my.pub"), src.path().join("my"));
    fs::write(&public, "MIIBkey\n").unwrap();
    fs::write(&private, "imported-private").unwrap();

    let mut req = request(ORCID, true);
    req.keypair = Some((public, private));
    let outcome = fx
        .run(&req, &RecordingPublisher::default(), &MemoryStore::default(), false)
        .unwrap();

    let graph = outcome.assertion.unwrap();
    assert_eq!(fx.read("id_rsa.pub"), b"MIIBkey\n");
    assert_eq!(
        graph.object(&Term::Blank(graph.key_declaration().clone()), vocab::HAS_PUBLIC_KEY),
        Some(&Term::Literal("MIIBkey\n".to_string()))
    );
}

#[test]
fn import_missing_source_keeps_existing_keys() {
    let fx = Fixture::new();
    let store = MemoryStore::default();
    fx.run(&request(ORCID, false), &RecordingPublisher::default(), &store, false)
        .unwrap();
    let before = fx.read("id_rsa.pub");

    let mut req = request(ORCID, false);
    req.keypair = Some((PathBuf::from("/nonexistent/a.pub"), PathBuf::from("/nonexistent/a")));
    let err = fx
        .run(&req, &RecordingPublisher::default(), &store, false)
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Key(IdentityError::SourceKeyNotFound { .. })));
    assert_eq!(fx.read("id_rsa.pub"), before);
}

#[test]
fn yaml_record_written_on_success() {
    let fx = Fixture::new();
    let store = YamlProfileStore::in_dir(&fx.dir);

    fx.run(&request(ORCID, true), &RecordingPublisher::default(), &store, false)
        .unwrap();

    let record = store.load().unwrap();
    assert_eq!(record.name, "Jane Doe");
    assert!(record
        .published_uri
        .unwrap()
        .starts_with("https://w3id.org/np/RAtest#keyDeclaration-"));
}
