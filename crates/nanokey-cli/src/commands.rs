//! CLI command implementations.

use anyhow::Context;
use dialoguer::{Confirm as ConfirmPrompt, Input};
use nanokey_core::orcid;
use nanokey_identity::{KeyStore, RsaKeyProvider};
use nanokey_profile::{
    Confirm, HttpPublisher, ProfileOutcome, ProfileRequest, ProfileWorkflow, PromptError,
    RecordError, Settings, YamlProfileStore,
};
use std::path::{Path, PathBuf};

pub type Result<T> = anyhow::Result<T>;

/// Where `nanokey setup` gets its keypair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeySource {
    /// Import the given `(public, private)` key files.
    Import(PathBuf, PathBuf),
    /// Use or generate the keys in the configuration directory.
    Local,
    /// Ask whether to import a keypair.
    #[default]
    Ask,
}

/// Options for `nanokey setup`. Anything left `None` is asked for.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub keys: KeySource,
    pub orcid_id: Option<String>,
    pub name: Option<String>,
    pub publish: Option<bool>,
    pub overwrite: bool,
    pub server_url: Option<String>,
}

/// Asks on the terminal before replacing keys.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm_overwrite(&self, dir: &Path) -> std::result::Result<bool, PromptError> {
        println!("A keypair already exists in {}.", dir.display());
        Ok(ConfirmPrompt::new()
            .with_prompt("Delete it and generate a new one?")
            .default(false)
            .interact()?)
    }
}

/// Set up the profile and keypair.
pub fn setup(config_dir: Option<PathBuf>, options: SetupOptions) -> Result<()> {
    let mut settings = Settings::load(config_dir).context("cannot load settings")?;
    if let Some(url) = options.server_url.clone() {
        settings.server_url = url;
    }

    let request = ProfileRequest {
        orcid_id: Some(match options.orcid_id {
            Some(id) => id,
            None => prompt_orcid()?,
        }),
        name: match options.name {
            Some(name) => name,
            None => prompt_name()?,
        },
        keypair: match options.keys {
            KeySource::Import(public, private) => Some((public, private)),
            KeySource::Local => None,
            KeySource::Ask => prompt_keypair()?,
        },
        publish: match options.publish {
            Some(publish) => publish,
            None => ConfirmPrompt::new()
                .with_prompt(format!("Publish your profile to {}?", settings.server_url))
                .default(true)
                .interact()?,
        },
    };

    let keystore = KeyStore::new(
        &settings.config_dir,
        Box::new(RsaKeyProvider::new(settings.key_bits)),
    );
    let publisher = HttpPublisher::new(&settings.server_url, settings.request_timeout())?;
    let store = YamlProfileStore::in_dir(&settings.config_dir);
    let confirm: &dyn Confirm = if options.overwrite {
        &true
    } else {
        &TerminalConfirm
    };

    let outcome = ProfileWorkflow::new(&keystore, &publisher, &store, confirm)
        .run(&request)
        .map_err(|e| {
            let step = e.step();
            anyhow::Error::new(e).context(format!("setup failed at step '{step}'"))
        })?;

    print_outcome(&outcome, store.path());
    Ok(())
}

/// Show the stored profile.
pub fn profile_show(config_dir: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load(config_dir).context("cannot load settings")?;
    let store = YamlProfileStore::in_dir(&settings.config_dir);

    let record = match store.load() {
        Ok(record) => record,
        Err(RecordError::NotFound { .. }) => {
            println!("No profile configured. Use 'nanokey setup' to create one.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Profile ({})", store.path().display());
    println!("  Name:        {}", record.name);
    println!(
        "  ORCID iD:    {}",
        record.orcid_id.as_ref().map_or("(none)", |o| o.as_str())
    );
    println!("  Public key:  {}", record.public_key_path.display());
    println!("  Private key: {}", record.private_key_path.display());
    println!(
        "  Published:   {}",
        record.published_uri.as_deref().unwrap_or("(not published)")
    );
    Ok(())
}

fn prompt_orcid() -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt("ORCID iD (e.g. https://orcid.org/0000-0001-2345-6789, empty to skip)")
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            orcid::validate(Some(input.trim()))
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?
        .trim()
        .to_string())
}

/// Asks for an existing keypair. An empty public key path means none.
fn prompt_keypair() -> Result<Option<(PathBuf, PathBuf)>> {
    let public = prompt_key_path("Path to an existing public key (empty to use local keys)", true)?;
    if public.is_empty() {
        return Ok(None);
    }
    let private = prompt_key_path("Path to the matching private key", false)?;
    Ok(Some((PathBuf::from(public), PathBuf::from(private))))
}

fn prompt_key_path(prompt: &str, allow_empty: bool) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty)
        .validate_with(move |input: &String| check_key_path(input, allow_empty))
        .interact_text()?
        .trim()
        .to_string())
}

fn check_key_path(input: &str, allow_empty: bool) -> std::result::Result<(), String> {
    let input = input.trim();
    if (allow_empty && input.is_empty()) || Path::new(input).is_file() {
        Ok(())
    } else {
        Err(format!("{input} is not a file"))
    }
}

fn prompt_name() -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt("Full name")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?)
}

fn print_outcome(outcome: &ProfileOutcome, profile_path: &Path) {
    let record = &outcome.record;
    println!("Keypair ({}):", outcome.resolution);
    println!("  Public key:  {}", record.public_key_path.display());
    println!("  Private key: {}", record.private_key_path.display());
    if let Some(published) = &outcome.published {
        println!("Published profile:");
        println!("  Nanopublication: {}", published.nanopub_uri);
        println!("  Key declaration: {}", published.concept_uri);
    }
    println!("Profile saved to {}", profile_path.display());
}
