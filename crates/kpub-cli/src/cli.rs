//! CLI argument definitions for kpub.
//!
//! Uses `clap` derive macros to define the full command surface. Each
//! command corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "kpub",
    version,
    about = "Publish Kotlin libraries to Maven Central",
    long_about = "kpub stages, signs, and packages Kotlin library builds into a local \
                  Maven-repository tree ready for upload to the central portal, driven \
                  by a single self-contained credential bundle."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold publication configuration in Kpub.toml
    Init,

    /// Verify credentials and publication metadata
    Check {
        /// Credential bundle text, overriding the configured sources
        #[arg(long)]
        credentials: Option<String>,
    },

    /// Show what a publish would produce
    Preview {
        /// Credential bundle text, overriding the configured sources
        #[arg(long)]
        credentials: Option<String>,
    },

    /// Stage and sign the publication locally
    Publish {
        /// Credential bundle text, overriding the configured sources
        #[arg(long)]
        credentials: Option<String>,
        /// Plan and validate, but stop before staging and signing
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage credential bundles
    Bundle {
        #[command(subcommand)]
        action: BundleAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum BundleAction {
    /// Encode key exports and account details into a bundle
    Create,
    /// Print a redacted summary of a bundle
    Inspect {
        /// Bundle file path, or the encoded text itself
        source: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
