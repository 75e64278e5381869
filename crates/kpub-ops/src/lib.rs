//! High-level operations behind the kpub CLI.
//!
//! Each module implements one user-facing command end to end: it loads
//! what it needs from the project directory, drives the publishing
//! pipeline, and reports progress on stderr. The CLI crate stays a thin
//! argument-parsing shell over these functions.

use std::path::PathBuf;

pub mod ops_bundle;
pub mod ops_check;
pub mod ops_init;
pub mod ops_preview;
pub mod ops_publish;

/// Project root for a command started in `cwd`: the nearest ancestor
/// holding `Kpub.toml`, or `cwd` itself when none is found. Commands
/// reading an existing project accept being started from any
/// subdirectory; the missing-manifest error then names the original
/// directory.
pub fn project_root(cwd: PathBuf) -> PathBuf {
    kpub_util::fs::find_ancestor_with(&cwd, kpub_core::MANIFEST_FILE).unwrap_or(cwd)
}
