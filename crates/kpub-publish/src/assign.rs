//! Assigns Maven coordinates to publication drafts.
//!
//! All defaults are resolved in one pass here; later stages read the
//! assigned coordinates and never recompute them.

use std::collections::BTreeMap;

use kpub_core::coordinates::MavenCoordinates;
use kpub_core::manifest::Manifest;
use kpub_core::target::{PublicationTarget, TargetDraft};
use kpub_util::errors::{KpubError, KpubResult};

/// The root coordinates every target derives its own from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateBase {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// Resolves the base coordinates from manifest and credentials.
///
/// Group precedence: `group-id` under `[publication]`, then `group` under
/// `[project]`, then the credential bundle's package group. Artifact id and
/// version fall back from `[publication]` overrides to the project name and
/// version.
pub fn resolve_base(
    manifest: &Manifest,
    package_group: Option<&str>,
) -> KpubResult<CoordinateBase> {
    let publication = &manifest.publication;
    let group_id = publication
        .group_id
        .clone()
        .or_else(|| manifest.project.group.clone())
        .or_else(|| package_group.map(str::to_string))
        .ok_or_else(|| KpubError::IncompletePublication {
            field: "group".into(),
            hint: "Set `group` under [project] (or `group-id` under [publication]), \
                   or store a package group in the credential bundle"
                .into(),
        })?;
    let artifact_id = publication
        .artifact_id
        .clone()
        .unwrap_or_else(|| manifest.project.name.clone());
    let version = publication
        .version
        .clone()
        .unwrap_or_else(|| manifest.project.version.clone());
    Ok(CoordinateBase {
        group_id,
        artifact_id,
        version,
    })
}

/// Gives every draft its coordinates.
///
/// The root-equivalent draft keeps the bare artifact id; every other target
/// gets `<base>-<lowercased target name>`. Two targets whose lowercased
/// names collide are rejected rather than silently merged.
pub fn assign(drafts: &[TargetDraft], base: &CoordinateBase) -> KpubResult<Vec<PublicationTarget>> {
    let mut claimed: BTreeMap<String, String> = BTreeMap::new();
    let mut targets = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let artifact_id = if draft.root_equivalent {
            base.artifact_id.clone()
        } else {
            format!("{}-{}", base.artifact_id, draft.name.to_lowercase())
        };
        if let Some(previous) = claimed.insert(artifact_id.clone(), draft.name.clone()) {
            return Err(KpubError::Generic {
                message: format!(
                    "Targets `{previous}` and `{}` both publish artifact id `{artifact_id}`",
                    draft.name
                ),
            }
            .into());
        }
        tracing::debug!("Assigned {artifact_id} to target {}", draft.name);
        targets.push(PublicationTarget {
            name: draft.name.clone(),
            platform: draft.platform,
            coordinates: MavenCoordinates::new(&base.group_id, artifact_id, &base.version),
            root_equivalent: draft.root_equivalent,
        });
    }
    Ok(targets)
}
