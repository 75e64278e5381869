use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::artifact::ArtifactKind;

/// The seam between kpub and the host build system.
///
/// Implementations answer two questions: which targets did the build
/// declare, and where is the file for a given artifact kind of a target.
/// Nothing else about the build is visible to the publishing pipeline.
pub trait BuildOutputProvider {
    /// Declared target names, in a stable order.
    fn list_targets(&self) -> Vec<String>;

    /// Locate the artifact file of `kind` for `target`, if the build
    /// produced one.
    fn find_artifact(&self, target: &str, kind: ArtifactKind) -> Option<PathBuf>;
}

/// Build outputs declared explicitly, target by target.
///
/// The simplest host integration, and the test double used throughout the
/// pipeline's own tests. Targets are listed in declaration order.
#[derive(Debug, Default)]
pub struct StaticOutputs {
    order: Vec<String>,
    artifacts: BTreeMap<String, BTreeMap<ArtifactKind, PathBuf>>,
}

impl StaticOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a target with no artifacts (yet).
    pub fn target(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.order.contains(&name) {
            self.order.push(name.clone());
            self.artifacts.entry(name).or_default();
        }
        self
    }

    /// Declare an artifact, declaring its target too if new.
    pub fn artifact(
        mut self,
        target: impl Into<String>,
        kind: ArtifactKind,
        file: impl Into<PathBuf>,
    ) -> Self {
        let target = target.into();
        if !self.order.contains(&target) {
            self.order.push(target.clone());
        }
        self.artifacts.entry(target).or_default().insert(kind, file.into());
        self
    }
}

impl BuildOutputProvider for StaticOutputs {
    fn list_targets(&self) -> Vec<String> {
        self.order.clone()
    }

    fn find_artifact(&self, target: &str, kind: ArtifactKind) -> Option<PathBuf> {
        self.artifacts.get(target)?.get(&kind).cloned()
    }
}

/// Build outputs discovered by scanning a directory tree.
///
/// Expects one subdirectory per target under the root
/// (`build/publications/<target>/` by convention), holding that target's
/// artifact files. Files are classified by their classifier suffix;
/// anything that is not a `.jar` or `.klib` is ignored. Targets are listed
/// in name order, which keeps repeated scans stable.
#[derive(Debug)]
pub struct DirectoryOutputs {
    root: PathBuf,
}

impl DirectoryOutputs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn classify(file_name: &str) -> Option<ArtifactKind> {
        let (stem, extension) = file_name.rsplit_once('.')?;
        if extension != "jar" && extension != "klib" {
            return None;
        }
        if stem.ends_with("-samplessources") {
            Some(ArtifactKind::SampleSources)
        } else if stem.ends_with("-sources") {
            Some(ArtifactKind::Sources)
        } else if stem.ends_with("-javadoc") {
            Some(ArtifactKind::Javadoc)
        } else if stem.ends_with("-metadata") {
            Some(ArtifactKind::Metadata)
        } else {
            Some(ArtifactKind::Primary)
        }
    }

    fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();
        paths
    }
}

impl BuildOutputProvider for DirectoryOutputs {
    fn list_targets(&self) -> Vec<String> {
        Self::sorted_entries(&self.root)
            .into_iter()
            .filter(|p| p.is_dir())
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }

    fn find_artifact(&self, target: &str, kind: ArtifactKind) -> Option<PathBuf> {
        Self::sorted_entries(&self.root.join(target))
            .into_iter()
            .filter(|p| p.is_file())
            .find(|p| {
                p.file_name()
                    .map(|n| Self::classify(&n.to_string_lossy()) == Some(kind))
                    .unwrap_or(false)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_outputs_preserve_declaration_order() {
        let outputs = StaticOutputs::new()
            .target("jvm")
            .target("linuxX64")
            .target("js")
            .artifact("jvm", ArtifactKind::Primary, "/tmp/demo.jar");
        assert_eq!(outputs.list_targets(), vec!["jvm", "linuxX64", "js"]);
        assert!(outputs.find_artifact("jvm", ArtifactKind::Primary).is_some());
        assert!(outputs.find_artifact("jvm", ArtifactKind::Sources).is_none());
        assert!(outputs.find_artifact("ghost", ArtifactKind::Primary).is_none());
    }

    #[test]
    fn classifies_files_by_suffix() {
        assert_eq!(
            DirectoryOutputs::classify("demo-1.0.0.jar"),
            Some(ArtifactKind::Primary)
        );
        assert_eq!(
            DirectoryOutputs::classify("demo-1.0.0-sources.jar"),
            Some(ArtifactKind::Sources)
        );
        assert_eq!(
            DirectoryOutputs::classify("demo-1.0.0-samplessources.jar"),
            Some(ArtifactKind::SampleSources)
        );
        assert_eq!(
            DirectoryOutputs::classify("demo.klib"),
            Some(ArtifactKind::Primary)
        );
        assert_eq!(DirectoryOutputs::classify("demo-1.0.0.pom"), None);
        assert_eq!(DirectoryOutputs::classify("README"), None);
    }

    #[test]
    fn scans_target_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let jvm = dir.path().join("jvm");
        std::fs::create_dir_all(&jvm).unwrap();
        std::fs::write(jvm.join("demo-1.0.0.jar"), "jar").unwrap();
        std::fs::write(jvm.join("demo-1.0.0-javadoc.jar"), "doc").unwrap();
        std::fs::create_dir_all(dir.path().join("linuxX64")).unwrap();
        std::fs::write(dir.path().join("stray.txt"), "ignored").unwrap();

        let outputs = DirectoryOutputs::new(dir.path());
        assert_eq!(outputs.list_targets(), vec!["jvm", "linuxX64"]);
        let javadoc = outputs.find_artifact("jvm", ArtifactKind::Javadoc).unwrap();
        assert!(javadoc.ends_with("jvm/demo-1.0.0-javadoc.jar"));
        assert!(outputs
            .find_artifact("linuxX64", ArtifactKind::Primary)
            .is_none());
    }
}
