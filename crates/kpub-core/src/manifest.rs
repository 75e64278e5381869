use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kpub_util::errors::{KpubError, KpubResult};

/// The parsed representation of a `Kpub.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub project: ProjectMetadata,

    #[serde(default)]
    pub publication: PublicationConfig,

    #[serde(default)]
    pub dependencies: BTreeMap<String, Dependency>,
}

/// Project identity from the `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Publication configuration from the `[publication]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationConfig {
    /// Project home page. Filled from `github` when unset.
    #[serde(default, rename = "project-url")]
    pub project_url: Option<String>,

    /// SCM connection string. Filled from `github` when unset.
    #[serde(default, rename = "scm-connection")]
    pub scm_connection: Option<String>,

    /// `"user/repo"` shortcut deriving the project URL and SCM connection.
    #[serde(default)]
    pub github: Option<String>,

    /// SPDX license id shortcut (`"Apache-2.0"`, `"MIT"`, ...).
    #[serde(default)]
    pub license: Option<String>,

    /// Single-developer shortcut; the value is used as id and name.
    #[serde(default)]
    pub developer: Option<String>,

    #[serde(default)]
    pub licenses: Vec<LicenseEntry>,

    #[serde(default)]
    pub developers: Vec<DeveloperEntry>,

    /// Override for the group id (defaults to `project.group`, then to the
    /// credential bundle's package group).
    #[serde(default, rename = "group-id")]
    pub group_id: Option<String>,

    /// Override for the root artifact id (defaults to `project.name`).
    #[serde(default, rename = "artifact-id")]
    pub artifact_id: Option<String>,

    /// Override for the published version (defaults to `project.version`).
    #[serde(default)]
    pub version: Option<String>,

    /// Name of the platform target the root publication should proxy.
    #[serde(default, rename = "platform-in-root")]
    pub platform_in_root: Option<String>,

    #[serde(default, rename = "root-proxy-mode")]
    pub root_proxy_mode: RootProxyMode,

    /// Scratch directory for key material during signing.
    #[serde(default, rename = "working-dir")]
    pub working_dir: Option<String>,

    /// Directory the publishable repository tree is staged into.
    #[serde(default, rename = "staging-dir")]
    pub staging_dir: Option<String>,

    /// Directory scanned for per-target build outputs.
    #[serde(default, rename = "build-outputs")]
    pub build_outputs: Option<String>,

    /// Write `.md5`/`.sha1`/`.sha256`/`.sha512` sidecars next to staged
    /// files.
    #[serde(default)]
    pub checksums: bool,
}

/// A license entry from `[[publication.licenses]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseEntry {
    pub name: String,
    pub url: String,
}

/// A developer entry from `[[publication.developers]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// How the root publication proxies its platform target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootProxyMode {
    /// Root re-publishes the platform target's artifacts under its own id.
    #[default]
    Inline,
    /// Root stays metadata-only and depends on the platform target.
    DependencyOnly,
}

/// A dependency declaration in Kpub.toml.
///
/// Supports both shorthand (`"group:artifact:version"`) and detailed forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Short(String),
    Detailed(DetailedDependency),
}

/// A dependency with explicit group, artifact, version, and optional scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedDependency {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default)]
    pub scope: Option<DependencyScope>,
    #[serde(default)]
    pub optional: bool,
}

/// Maven-compatible dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Compile,
    Runtime,
    Provided,
    Test,
}

impl Default for DependencyScope {
    fn default() -> Self {
        Self::Compile
    }
}

/// Default signing working directory, relative to the project root.
pub const DEFAULT_WORKING_DIR: &str = "build/publishing-tmp";
/// Default staging repository directory, relative to the project root.
pub const DEFAULT_STAGING_DIR: &str = "build/repo";
/// Default build output directory, relative to the project root.
pub const DEFAULT_BUILD_OUTPUTS: &str = "build/publications";

impl Manifest {
    /// Load and parse a `Kpub.toml` file from the given path.
    ///
    /// Before parsing, `${env:VAR}` references in the manifest content are
    /// resolved using `.kpub.env` (if present alongside `Kpub.toml`) and
    /// process environment variables.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| KpubError::Manifest {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;

        let dir = path.parent().unwrap_or(Path::new("."));
        let env_vars =
            crate::properties::load_env_file(&dir.join(".kpub.env")).unwrap_or_default();
        let resolved = crate::properties::interpolate(&content, &env_vars);

        Self::from_str(&resolved)
    }

    /// Parse a `Kpub.toml` from a string (no interpolation).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            KpubError::Manifest {
                message: format!("Failed to parse Kpub.toml: {e}"),
            }
            .into()
        })
    }

    /// Build properties visible to credential lookup: `.kpub.env` entries
    /// from the project root.
    pub fn build_properties(project_root: &Path) -> BTreeMap<String, String> {
        crate::properties::load_env_file(&project_root.join(".kpub.env")).unwrap_or_default()
    }
}

impl PublicationConfig {
    /// Project URL, honoring the `github` shortcut.
    pub fn resolved_project_url(&self) -> Option<String> {
        self.project_url.clone().or_else(|| {
            self.github
                .as_ref()
                .map(|repo| format!("https://github.com/{repo}"))
        })
    }

    /// SCM connection, honoring the `github` shortcut.
    pub fn resolved_scm_connection(&self) -> Option<String> {
        self.scm_connection.clone().or_else(|| {
            self.github
                .as_ref()
                .map(|repo| format!("scm:git:git://github.com/{repo}.git"))
        })
    }

    /// License list, honoring the SPDX `license` shortcut.
    pub fn resolved_licenses(&self) -> KpubResult<Vec<LicenseEntry>> {
        let mut licenses = self.licenses.clone();
        if let Some(spdx) = &self.license {
            licenses.push(license_from_spdx(spdx)?);
        }
        Ok(licenses)
    }

    /// Developer list, honoring the `developer` shortcut.
    pub fn resolved_developers(&self) -> Vec<DeveloperEntry> {
        let mut developers = self.developers.clone();
        if let Some(id) = &self.developer {
            developers.push(DeveloperEntry {
                id: id.clone(),
                name: Some(id.clone()),
                email: None,
                url: None,
            });
        }
        developers
    }

    /// Check that everything the central repository rejects publications
    /// without is configured. Each failure names the missing field and the
    /// exact line to add.
    pub fn require_complete(&self) -> KpubResult<()> {
        if self.resolved_project_url().is_none() {
            return Err(KpubError::IncompletePublication {
                field: "project-url".into(),
                hint: "Add `project-url = \"https://...\"` or `github = \"user/repo\"` \
                       to [publication]"
                    .into(),
            }
            .into());
        }
        if self.resolved_scm_connection().is_none() {
            return Err(KpubError::IncompletePublication {
                field: "scm-connection".into(),
                hint: "Add `scm-connection = \"scm:git:git://...\"` or `github = \"user/repo\"` \
                       to [publication]"
                    .into(),
            }
            .into());
        }
        if self.resolved_licenses()?.is_empty() {
            return Err(KpubError::IncompletePublication {
                field: "licenses".into(),
                hint: "Add `license = \"Apache-2.0\"` or a [[publication.licenses]] table".into(),
            }
            .into());
        }
        if self.resolved_developers().is_empty() {
            return Err(KpubError::IncompletePublication {
                field: "developers".into(),
                hint: "Add `developer = \"your-id\"` or a [[publication.developers]] table".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn working_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(self.working_dir.as_deref().unwrap_or(DEFAULT_WORKING_DIR))
    }

    pub fn staging_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(self.staging_dir.as_deref().unwrap_or(DEFAULT_STAGING_DIR))
    }

    pub fn build_outputs(&self, project_root: &Path) -> PathBuf {
        project_root.join(
            self.build_outputs
                .as_deref()
                .unwrap_or(DEFAULT_BUILD_OUTPUTS),
        )
    }
}

fn license_from_spdx(id: &str) -> KpubResult<LicenseEntry> {
    let (name, url) = match id {
        "Apache-2.0" => (
            "Apache-2.0",
            "https://www.apache.org/licenses/LICENSE-2.0",
        ),
        "MIT" => ("MIT", "https://opensource.org/licenses/MIT"),
        "GPL-2.0" => (
            "GNU GPLv2",
            "https://www.gnu.org/licenses/old-licenses/gpl-2.0.en.html",
        ),
        "GPL-3.0" => ("GNU GPLv3", "https://www.gnu.org/licenses/gpl-3.0.en.html"),
        "AGPL-3.0" => (
            "GNU AGPLv3",
            "https://www.gnu.org/licenses/agpl-3.0.en.html",
        ),
        other => {
            return Err(KpubError::Manifest {
                message: format!(
                    "Unknown license id `{other}` (known: Apache-2.0, MIT, GPL-2.0, \
                     GPL-3.0, AGPL-3.0); use [[publication.licenses]] for anything else"
                ),
            }
            .into())
        }
    };
    Ok(LicenseEntry {
        name: name.into(),
        url: url.into(),
    })
}
