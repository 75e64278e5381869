//! Core data types for kpub.
//!
//! This crate defines the fundamental types that represent a publishable
//! project: manifest parsing, platform classification, artifact kinds,
//! Maven coordinates, publication targets, and the provider seam through
//! which build outputs are located.
//!
//! This crate is intentionally free of network I/O.

/// Manifest file name looked up from the invocation directory upward.
pub const MANIFEST_FILE: &str = "Kpub.toml";

pub mod artifact;
pub mod coordinates;
pub mod manifest;
pub mod platform;
pub mod properties;
pub mod provider;
pub mod target;
