//! Check command implementation.

use miette::Result;

pub fn exec(credentials: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(kpub_util::errors::KpubError::Io)?;
    kpub_ops::ops_check::check(&kpub_ops::project_root(cwd), credentials)
}
