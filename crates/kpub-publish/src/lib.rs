//! Publishing pipeline for Maven Central releases.
//!
//! The pipeline runs in a fixed order: [`inventory`] enumerates what the
//! build produced, [`assign`] gives every target its Maven coordinates,
//! [`attach`] collects the artifact files each platform must ship,
//! [`root_proxy`] rewrites the root module when a platform target is
//! promoted into it, [`stage`] lays everything out as a local Maven
//! repository and [`signing`] produces the detached signatures Maven
//! Central requires. [`plan`] ties the steps together.

pub mod archives;
pub mod assign;
pub mod attach;
pub mod inventory;
pub mod plan;
pub mod preview;
pub mod root_proxy;
pub mod signing;
pub mod stage;
