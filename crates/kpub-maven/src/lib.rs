//! Maven publication formats: POM documents, Gradle module descriptors,
//! checksum computation, and the staged repository layout.

pub mod checksum;
pub mod descriptor;
pub mod layout;
pub mod pom;
