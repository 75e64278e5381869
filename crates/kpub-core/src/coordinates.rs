use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Maven coordinates of one publication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MavenCoordinates {
    #[serde(rename = "group-id")]
    pub group_id: String,
    #[serde(rename = "artifact-id")]
    pub artifact_id: String,
    pub version: String,
}

impl MavenCoordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"` into coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
            Some(Self::new(parts[0], parts[1], parts[2]))
        } else {
            None
        }
    }

    /// File name of one artifact in this publication:
    /// `<artifactId>-<version>[-<classifier>].<ext>`.
    pub fn artifact_file_name(&self, classifier: Option<&str>, extension: &str) -> String {
        match classifier {
            Some(classifier) => {
                format!("{}-{}-{classifier}.{extension}", self.artifact_id, self.version)
            }
            None => format!("{}-{}.{extension}", self.artifact_id, self.version),
        }
    }

    /// Directory of this publication under a Maven repository root:
    /// `group/as/path/artifact-id/version`.
    pub fn repository_dir(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.group_id.split('.') {
            path.push(segment);
        }
        path.push(&self.artifact_id);
        path.push(&self.version);
        path
    }

    /// `group:artifact` without the version, as module descriptors spell it.
    pub fn module_id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl std::fmt::Display for MavenCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
