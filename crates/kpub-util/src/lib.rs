//! Shared utilities for kpub.
//!
//! This crate provides cross-cutting concerns used by all other kpub crates:
//! the unified error type, filesystem helpers for the publishing working
//! directory, an external process runner for the signing backend, and
//! terminal progress output.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
