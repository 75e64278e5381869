use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;

/// Platform family of a publication target.
///
/// Target names are classified once, up front; everything downstream
/// dispatches on this enum rather than re-inspecting name strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Kotlin/JVM or Android.
    Jvm,
    /// Kotlin/Native (linux, mingw, apple targets).
    Native,
    /// Kotlin/JS or WASM.
    Web,
    /// The common (metadata) module of a multi-platform project.
    Common,
}

impl PlatformKind {
    /// Classify a declared target name.
    ///
    /// Unrecognized names fall through to [`PlatformKind::Native`], which
    /// matches how Kotlin names its dozens of native targets
    /// (`linuxX64`, `iosSimulatorArm64`, ...).
    pub fn classify(target_name: &str) -> Self {
        match target_name {
            "jvm" | "android" => Self::Jvm,
            "js" => Self::Web,
            name if name.starts_with("wasm") => Self::Web,
            "common" | "metadata" | "kotlinMultiplatform" => Self::Common,
            _ => Self::Native,
        }
    }

    /// Artifact kinds that must exist for a target of this platform.
    pub fn expected_kinds(&self) -> &'static [ArtifactKind] {
        match self {
            Self::Jvm => &[
                ArtifactKind::Primary,
                ArtifactKind::Sources,
                ArtifactKind::Javadoc,
            ],
            Self::Native => &[ArtifactKind::Primary, ArtifactKind::Javadoc],
            Self::Web => &[
                ArtifactKind::Sources,
                ArtifactKind::SampleSources,
                ArtifactKind::Javadoc,
            ],
            Self::Common => &[ArtifactKind::Sources],
        }
    }

    /// Artifact kinds attached when present but not required.
    pub fn optional_kinds(&self) -> &'static [ArtifactKind] {
        match self {
            Self::Native => &[ArtifactKind::Metadata],
            _ => &[],
        }
    }

    /// Whether artifacts of this platform can be consumed from JVM builds.
    pub fn jvm_reachable(&self) -> bool {
        matches!(self, Self::Jvm | Self::Common)
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Jvm => "jvm",
            Self::Native => "native",
            Self::Web => "web",
            Self::Common => "common",
        };
        f.write_str(name)
    }
}
