//! Gradle module descriptors (`.module` files).
//!
//! Platform publications get a descriptor listing their real files with
//! digests; the root of a multi-platform publication gets a descriptor
//! whose variants point at the platform modules via `available-at`, which
//! is how consumers land on the right artifact from the bare coordinates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kpub_core::artifact::ArtifactKind;
use kpub_core::coordinates::MavenCoordinates;
use kpub_core::platform::PlatformKind;
use kpub_util::errors::{KpubError, KpubResult};

use crate::checksum::FileChecksums;

/// Gradle Module Metadata format version this tool emits.
pub const FORMAT_VERSION: &str = "1.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(rename = "formatVersion")]
    pub format_version: String,
    pub component: Component,
    #[serde(rename = "createdBy")]
    pub created_by: CreatedBy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub group: String,
    pub module: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedBy {
    pub kpub: ToolVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolVersion {
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
    #[serde(
        rename = "available-at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub available_at: Option<AvailableAt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<VariantFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<VariantDependency>,
}

/// Redirect to another module in the same repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableAt {
    pub url: String,
    pub group: String,
    pub module: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantFile {
    pub name: String,
    pub url: String,
    pub size: u64,
    pub sha512: String,
    pub sha256: String,
    pub sha1: String,
    pub md5: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDependency {
    pub group: String,
    pub module: String,
    pub version: VersionRequirement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRequirement {
    pub requires: String,
}

impl VariantFile {
    /// A file entry for `name` living in the same repository directory.
    pub fn from_checksums(name: impl Into<String>, sums: &FileChecksums) -> Self {
        let name = name.into();
        Self {
            url: name.clone(),
            name,
            size: sums.size,
            sha512: sums.sha512.clone(),
            sha256: sums.sha256.clone(),
            sha1: sums.sha1.clone(),
            md5: sums.md5.clone(),
        }
    }
}

impl ModuleDescriptor {
    pub fn to_json(&self) -> KpubResult<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(|e| KpubError::Generic {
            message: format!("Failed to serialize module descriptor: {e}"),
        })?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(json: &str) -> KpubResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            KpubError::Generic {
                message: format!("Failed to parse module descriptor: {e}"),
            }
            .into()
        })
    }
}

/// Descriptor for one platform publication, from its staged files.
///
/// `files` pairs each attached artifact kind with its staged file entry.
pub fn platform_module(
    coordinates: &MavenCoordinates,
    platform: PlatformKind,
    files: &[(ArtifactKind, VariantFile)],
    dependencies: &[VariantDependency],
) -> ModuleDescriptor {
    let mut variants = Vec::new();
    for (kind, file) in files {
        match kind {
            ArtifactKind::Primary => {
                variants.push(Variant {
                    name: "apiElements".into(),
                    attributes: usage_attributes(platform, api_usage(platform)),
                    available_at: None,
                    files: vec![file.clone()],
                    dependencies: dependencies.to_vec(),
                });
                if platform == PlatformKind::Jvm {
                    variants.push(Variant {
                        name: "runtimeElements".into(),
                        attributes: usage_attributes(platform, "java-runtime"),
                        available_at: None,
                        files: vec![file.clone()],
                        dependencies: dependencies.to_vec(),
                    });
                }
            }
            ArtifactKind::Sources => variants.push(docs_variant("sourcesElements", "sources", file)),
            ArtifactKind::Javadoc => variants.push(docs_variant("javadocElements", "javadoc", file)),
            ArtifactKind::SampleSources => {
                variants.push(docs_variant("sampleSourcesElements", "samplessources", file))
            }
            ArtifactKind::Metadata => variants.push(Variant {
                name: "metadataApiElements".into(),
                attributes: attrs(&[
                    ("org.gradle.usage", "kotlin-metadata"),
                    ("org.gradle.category", "library"),
                ]),
                available_at: None,
                files: vec![file.clone()],
                dependencies: dependencies.to_vec(),
            }),
        }
    }
    // A common module publishes no binary, but consumers still resolve its
    // dependency graph through the metadata variant.
    if platform == PlatformKind::Common && !dependencies.is_empty() {
        variants.insert(
            0,
            Variant {
                name: "metadataApiElements".into(),
                attributes: attrs(&[
                    ("org.gradle.usage", "kotlin-metadata"),
                    ("org.gradle.category", "library"),
                ]),
                available_at: None,
                files: Vec::new(),
                dependencies: dependencies.to_vec(),
            },
        );
    }
    descriptor(coordinates, variants)
}

/// Descriptor for the root of a multi-platform publication.
///
/// Written after every platform descriptor: each variant redirects to a
/// platform module that must already be staged.
pub fn root_module(
    root: &MavenCoordinates,
    platforms: &[(String, MavenCoordinates, PlatformKind)],
) -> ModuleDescriptor {
    let mut variants = Vec::new();
    for (target, coordinates, platform) in platforms {
        let redirect = AvailableAt {
            url: format!(
                "../../{module}/{version}/{module}-{version}.module",
                module = coordinates.artifact_id,
                version = coordinates.version
            ),
            group: coordinates.group_id.clone(),
            module: coordinates.artifact_id.clone(),
            version: coordinates.version.clone(),
        };
        variants.push(Variant {
            name: format!("{target}ApiElements-published"),
            attributes: usage_attributes(*platform, api_usage(*platform)),
            available_at: Some(redirect.clone()),
            files: Vec::new(),
            dependencies: Vec::new(),
        });
        if *platform == PlatformKind::Jvm {
            variants.push(Variant {
                name: format!("{target}RuntimeElements-published"),
                attributes: usage_attributes(*platform, "java-runtime"),
                available_at: Some(redirect),
                files: Vec::new(),
                dependencies: Vec::new(),
            });
        }
    }
    descriptor(root, variants)
}

fn descriptor(coordinates: &MavenCoordinates, variants: Vec<Variant>) -> ModuleDescriptor {
    ModuleDescriptor {
        format_version: FORMAT_VERSION.into(),
        component: Component {
            group: coordinates.group_id.clone(),
            module: coordinates.artifact_id.clone(),
            version: coordinates.version.clone(),
            attributes: attrs(&[("org.gradle.status", "release")]),
        },
        created_by: CreatedBy {
            kpub: ToolVersion {
                version: env!("CARGO_PKG_VERSION").into(),
            },
        },
        variants,
    }
}

fn docs_variant(name: &str, docs_type: &str, file: &VariantFile) -> Variant {
    Variant {
        name: name.into(),
        attributes: attrs(&[
            ("org.gradle.category", "documentation"),
            ("org.gradle.docstype", docs_type),
            ("org.gradle.usage", "java-runtime"),
        ]),
        available_at: None,
        files: vec![file.clone()],
        dependencies: Vec::new(),
    }
}

fn api_usage(platform: PlatformKind) -> &'static str {
    match platform {
        PlatformKind::Jvm => "java-api",
        PlatformKind::Native | PlatformKind::Web => "kotlin-api",
        PlatformKind::Common => "kotlin-metadata",
    }
}

fn usage_attributes(platform: PlatformKind, usage: &str) -> BTreeMap<String, Value> {
    let mut attributes = attrs(&[
        ("org.gradle.usage", usage),
        ("org.gradle.category", "library"),
    ]);
    attributes.insert(
        "org.jetbrains.kotlin.platform.type".into(),
        Value::String(platform.to_string()),
    );
    attributes
}

fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}
