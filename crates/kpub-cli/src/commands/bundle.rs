//! Bundle subcommand implementations.

use miette::Result;

pub fn create() -> Result<()> {
    let cwd = std::env::current_dir().map_err(kpub_util::errors::KpubError::Io)?;
    kpub_ops::ops_bundle::create(&cwd)
}

pub fn inspect(source: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(kpub_util::errors::KpubError::Io)?;
    kpub_ops::ops_bundle::inspect(&kpub_ops::project_root(cwd), source)
}
