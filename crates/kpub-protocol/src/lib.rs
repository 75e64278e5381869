//! Credential bundle protocol for kpub.
//!
//! A credential bundle packs the PGP key pair and the repository account
//! into a single hex-encoded protobuf record, so the whole secret can live
//! in one CI variable. This crate owns the wire format, its validation
//! rules, and the multi-alias lookup that locates the bundle at run time.

pub mod credentials;
pub mod lookup;
