//! Nanokey CLI - set up a nanopub profile from the command line.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Nanokey - keypair and profile setup for nanopublications
#[derive(Parser, Debug)]
#[command(name = "nanokey")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration directory (default: $NANOKEY_CONFIG_DIR or ~/.nanopub)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set up your profile and keypair
    Setup(SetupArgs),

    /// Inspect the stored profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct SetupArgs {
    /// Import an existing keypair instead of generating one
    #[arg(long, num_args = 2, value_names = ["PUBLIC", "PRIVATE"])]
    keypair: Option<Vec<PathBuf>>,

    /// Use the keys in the configuration directory, generating them if missing
    #[arg(long, conflicts_with = "keypair")]
    local_keys: bool,

    /// Your ORCID iD, e.g. https://orcid.org/0000-0001-2345-6789 (empty to skip)
    #[arg(long)]
    orcid_id: Option<String>,

    /// Your full name
    #[arg(long)]
    name: Option<String>,

    /// Publish the profile to the nanopub network
    #[arg(long, conflicts_with = "no_publish")]
    publish: bool,

    /// Do not publish the profile
    #[arg(long)]
    no_publish: bool,

    /// Replace existing keys without asking
    #[arg(short, long)]
    yes: bool,

    /// Nanopub server to publish to
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ProfileCommands {
    /// Show the stored profile
    Show,
}

impl From<SetupArgs> for commands::SetupOptions {
    fn from(args: SetupArgs) -> Self {
        let publish = match (args.publish, args.no_publish) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let imported = args
            .keypair
            .and_then(|paths| <[PathBuf; 2]>::try_from(paths).ok());
        let keys = match (imported, args.local_keys) {
            (Some([public, private]), _) => commands::KeySource::Import(public, private),
            (None, true) => commands::KeySource::Local,
            (None, false) => commands::KeySource::Ask,
        };
        Self {
            keys,
            orcid_id: args.orcid_id,
            name: args.name,
            publish,
            overwrite: args.yes,
            server_url: args.server_url,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("nanokey={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Setup(args) => commands::setup(cli.config_dir, args.into()),
        Commands::Profile { command } => match command {
            ProfileCommands::Show => commands::profile_show(cli.config_dir),
        },
        Commands::Version => {
            println!("nanokey {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
