//! # Nanokey Profile
//!
//! Profile setup for nanopub users: key resolution, optional publication of
//! the identity assertion, and the persisted profile record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nanokey_identity::{KeyStore, RsaKeyProvider};
//! use nanokey_profile::{
//!     HttpPublisher, ProfileRequest, ProfileWorkflow, Settings, YamlProfileStore,
//! };
//!
//! let settings = Settings::load(None)?;
//! let keystore = KeyStore::new(
//!     &settings.config_dir,
//!     Box::new(RsaKeyProvider::new(settings.key_bits)),
//! );
//! let publisher = HttpPublisher::new(&settings.server_url, settings.request_timeout())?;
//! let store = YamlProfileStore::in_dir(&settings.config_dir);
//!
//! let workflow = ProfileWorkflow::new(&keystore, &publisher, &store, &false);
//! let outcome = workflow.run(&ProfileRequest {
//!     name: "Jane Doe".to_string(),
//!     orcid_id: Some("https://orcid.org/0000-0001-2345-6789".to_string()),
//!     keypair: None,
//!     publish: false,
//! })?;
//! println!("keys: {}", outcome.resolution);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod nanopub;
mod publish;
mod record;
pub mod settings;
mod workflow;

pub use error::{PromptError, PublishError, RecordError, Result, SettingsError, WorkflowError};
pub use publish::{HttpPublisher, Published, Publisher};
pub use record::{ProfileRecord, ProfileStore, YamlProfileStore, PROFILE_FILE};
pub use settings::Settings;
pub use workflow::{Confirm, KeyResolution, ProfileOutcome, ProfileRequest, ProfileWorkflow};
