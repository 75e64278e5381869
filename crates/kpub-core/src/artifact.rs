use serde::{Deserialize, Serialize};

/// The role an artifact file plays within one publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// The compiled binary (jar, klib).
    Primary,
    /// Source archive.
    Sources,
    /// API documentation archive.
    Javadoc,
    /// Sample source archive.
    SampleSources,
    /// Kotlin metadata archive (native targets).
    Metadata,
}

impl ArtifactKind {
    /// The Maven classifier suffix, or `None` for the primary artifact.
    pub fn classifier(&self) -> Option<&'static str> {
        match self {
            Self::Primary => None,
            Self::Sources => Some("sources"),
            Self::Javadoc => Some("javadoc"),
            Self::SampleSources => Some("samplessources"),
            Self::Metadata => Some("metadata"),
        }
    }

    /// Human-readable label used in error messages and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Sources => "sources",
            Self::Javadoc => "javadoc",
            Self::SampleSources => "sample sources",
            Self::Metadata => "metadata",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
