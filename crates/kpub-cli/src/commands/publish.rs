//! Publish command implementation.

use miette::Result;

pub fn exec(credentials: Option<String>, dry_run: bool) -> Result<()> {
    let cwd = std::env::current_dir().map_err(kpub_util::errors::KpubError::Io)?;
    let options = kpub_ops::ops_publish::PublishOptions {
        credentials,
        dry_run,
    };
    kpub_ops::ops_publish::publish(&kpub_ops::project_root(cwd), &options)
}
