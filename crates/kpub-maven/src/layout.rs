//! Staged repository layout: where publication files land before upload.

use std::path::{Path, PathBuf};

use kpub_core::coordinates::MavenCoordinates;
use kpub_util::errors::{KpubError, KpubResult};

/// A local directory tree laid out like a Maven repository.
///
/// Every publication gets `group/as/path/artifact-id/version/` under the
/// root; uploads later mirror this tree verbatim.
#[derive(Debug, Clone)]
pub struct StagingRepository {
    root: PathBuf,
}

impl StagingRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one publication.
    pub fn publication_dir(&self, coordinates: &MavenCoordinates) -> PathBuf {
        self.root.join(coordinates.repository_dir())
    }

    /// Canonical path of one artifact file.
    pub fn file_path(
        &self,
        coordinates: &MavenCoordinates,
        classifier: Option<&str>,
        extension: &str,
    ) -> PathBuf {
        self.publication_dir(coordinates)
            .join(coordinates.artifact_file_name(classifier, extension))
    }

    /// Copy a build output into its canonical place. Returns the staged path.
    pub fn import_file(
        &self,
        coordinates: &MavenCoordinates,
        classifier: Option<&str>,
        extension: &str,
        source: &Path,
    ) -> KpubResult<PathBuf> {
        let destination = self.file_path(coordinates, classifier, extension);
        kpub_util::fs::ensure_dir(self.publication_dir(coordinates).as_path())
            .map_err(KpubError::Io)?;
        std::fs::copy(source, &destination).map_err(|e| KpubError::Generic {
            message: format!(
                "Failed to stage {} as {}: {e}",
                source.display(),
                destination.display()
            ),
        })?;
        tracing::debug!("Staged {} as {}", source.display(), destination.display());
        Ok(destination)
    }

    /// Write generated content (a POM or module descriptor) into place.
    pub fn write_file(
        &self,
        coordinates: &MavenCoordinates,
        classifier: Option<&str>,
        extension: &str,
        content: &str,
    ) -> KpubResult<PathBuf> {
        let destination = self.file_path(coordinates, classifier, extension);
        kpub_util::fs::ensure_dir(self.publication_dir(coordinates).as_path())
            .map_err(KpubError::Io)?;
        std::fs::write(&destination, content).map_err(KpubError::Io)?;
        Ok(destination)
    }

    /// Files currently staged for one publication, in name order.
    pub fn list_files(&self, coordinates: &MavenCoordinates) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.publication_dir(coordinates)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
