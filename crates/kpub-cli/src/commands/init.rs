//! Init command implementation.

use miette::Result;

pub fn exec() -> Result<()> {
    let cwd = std::env::current_dir().map_err(kpub_util::errors::KpubError::Io)?;
    kpub_ops::ops_init::init(&cwd)
}
