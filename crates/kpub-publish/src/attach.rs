//! Collects the artifact files each publication must ship.

use std::path::PathBuf;

use kpub_core::artifact::ArtifactKind;
use kpub_core::provider::BuildOutputProvider;
use kpub_core::target::PublicationTarget;
use kpub_util::errors::{KpubError, KpubResult};

/// One artifact file bound to a publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedArtifact {
    pub kind: ArtifactKind,
    pub file: PathBuf,
    /// Extension the file is staged under (`jar`, `klib`, ...).
    pub extension: String,
}

impl AttachedArtifact {
    fn new(kind: ArtifactKind, file: PathBuf) -> Self {
        let extension = file
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jar")
            .to_string();
        Self {
            kind,
            file,
            extension,
        }
    }
}

/// Resolves every artifact kind the target's platform calls for.
///
/// Expected kinds are mandatory (the central repository rejects incomplete
/// publications); optional kinds attach only when the provider has them.
pub fn attach(
    target: &PublicationTarget,
    provider: &dyn BuildOutputProvider,
) -> KpubResult<Vec<AttachedArtifact>> {
    let mut artifacts = Vec::new();
    for &kind in target.platform.expected_kinds() {
        let Some(file) = provider.find_artifact(&target.name, kind) else {
            return Err(KpubError::MissingArtifact {
                target: target.name.clone(),
                kind: kind.label().into(),
            }
            .into());
        };
        artifacts.push(AttachedArtifact::new(kind, file));
    }
    for &kind in target.platform.optional_kinds() {
        if let Some(file) = provider.find_artifact(&target.name, kind) {
            artifacts.push(AttachedArtifact::new(kind, file));
        }
    }
    tracing::debug!("Attached {} artifacts for target {}", artifacts.len(), target.name);
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpub_core::coordinates::MavenCoordinates;
    use kpub_core::platform::PlatformKind;
    use kpub_core::provider::StaticOutputs;

    fn target(name: &str, platform: PlatformKind) -> PublicationTarget {
        PublicationTarget {
            name: name.into(),
            platform,
            coordinates: MavenCoordinates::new("com.example", "demo", "1.0.0"),
            root_equivalent: false,
        }
    }

    #[test]
    fn jvm_target_attaches_binary_sources_and_javadoc() {
        let outputs = StaticOutputs::new()
            .artifact("jvm", ArtifactKind::Primary, "out/demo.jar")
            .artifact("jvm", ArtifactKind::Sources, "out/demo-sources.jar")
            .artifact("jvm", ArtifactKind::Javadoc, "out/demo-javadoc.jar");
        let artifacts = attach(&target("jvm", PlatformKind::Jvm), &outputs).unwrap();
        let kinds: Vec<ArtifactKind> = artifacts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            [
                ArtifactKind::Primary,
                ArtifactKind::Sources,
                ArtifactKind::Javadoc
            ]
        );
        assert!(artifacts.iter().all(|a| a.extension == "jar"));
    }

    #[test]
    fn missing_expected_kind_names_target_and_kind() {
        let outputs = StaticOutputs::new().artifact("jvm", ArtifactKind::Primary, "out/demo.jar");
        let err = attach(&target("jvm", PlatformKind::Jvm), &outputs).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("sources"));
        assert!(text.contains("`jvm`"));
    }

    #[test]
    fn native_metadata_attaches_only_when_present() {
        let bare = StaticOutputs::new()
            .artifact("linuxX64", ArtifactKind::Primary, "out/demo.klib")
            .artifact("linuxX64", ArtifactKind::Javadoc, "out/demo-javadoc.jar");
        let artifacts = attach(&target("linuxX64", PlatformKind::Native), &bare).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].extension, "klib");

        let with_metadata = bare.artifact(
            "linuxX64",
            ArtifactKind::Metadata,
            "out/demo-metadata.jar",
        );
        let artifacts = attach(&target("linuxX64", PlatformKind::Native), &with_metadata).unwrap();
        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[2].kind, ArtifactKind::Metadata);
    }
}
