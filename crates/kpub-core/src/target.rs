use crate::coordinates::MavenCoordinates;
use crate::platform::PlatformKind;

/// A publication target discovered from the build, before coordinates are
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDraft {
    /// Declared target name (`jvm`, `linuxX64`, `common`, ...).
    pub name: String,
    pub platform: PlatformKind,
    /// Whether this target's publication carries the bare artifact id.
    ///
    /// True for the single JVM target of a single-platform project and for
    /// the common module of a multi-platform project.
    pub root_equivalent: bool,
}

impl TargetDraft {
    pub fn new(name: impl Into<String>, platform: PlatformKind) -> Self {
        Self {
            name: name.into(),
            platform,
            root_equivalent: false,
        }
    }

    pub fn root_equivalent(mut self) -> Self {
        self.root_equivalent = true;
        self
    }
}

/// A publication target with assigned coordinates. Immutable once built;
/// later pipeline stages read but never rewrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationTarget {
    pub name: String,
    pub platform: PlatformKind,
    pub coordinates: MavenCoordinates,
    pub root_equivalent: bool,
}

impl PublicationTarget {
    pub fn coordinates(&self) -> &MavenCoordinates {
        &self.coordinates
    }
}
