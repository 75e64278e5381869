//! Command dispatch and handler modules.

mod bundle;
mod check;
mod init;
mod preview;
mod publish;

use miette::Result;

use crate::cli::{BundleAction, Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init => init::exec(),
        Command::Check { credentials } => check::exec(credentials.as_deref()),
        Command::Preview { credentials } => preview::exec(credentials.as_deref()),
        Command::Publish {
            credentials,
            dry_run,
        } => publish::exec(credentials, dry_run),
        Command::Bundle { action } => match action {
            BundleAction::Create => bundle::create(),
            BundleAction::Inspect { source } => bundle::inspect(source.as_deref()),
        },
    }
}
