//! Builds the complete publication plan for one publish run.
//!
//! A plan is the in-memory publishable graph: every target with its
//! coordinates, artifact files, and POM, root-proxy rewrites already
//! applied. Staging and signing consume the plan without revisiting any
//! of these decisions.

use kpub_core::artifact::ArtifactKind;
use kpub_core::manifest::{Dependency, DependencyScope, Manifest};
use kpub_core::platform::PlatformKind;
use kpub_core::provider::BuildOutputProvider;
use kpub_core::target::PublicationTarget;
use kpub_maven::descriptor::{VariantDependency, VersionRequirement};
use kpub_maven::pom::{Developer, License, PomDependency, PomDocument, Scm};
use kpub_util::errors::{KpubError, KpubResult};

use crate::attach::{self, AttachedArtifact};
use crate::root_proxy::{self, RootProxyConfig};
use crate::{assign, inventory};

/// One target's publication: coordinates, artifact files, and POM.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub target: PublicationTarget,
    pub artifacts: Vec<AttachedArtifact>,
    pub pom: PomDocument,
}

/// The full publishable graph, root publication ordered last.
#[derive(Debug, Clone)]
pub struct PublishPlan {
    pub publications: Vec<Publication>,
    /// Declared dependencies in module-descriptor form.
    pub descriptor_dependencies: Vec<VariantDependency>,
    /// Name of the platform target the root proxies, when configured.
    pub proxied_target: Option<String>,
}

impl PublishPlan {
    pub fn root(&self) -> Option<&Publication> {
        self.publications.iter().find(|p| p.target.root_equivalent)
    }

    pub fn is_multiplatform(&self) -> bool {
        self.publications.len() > 1
    }
}

/// Runs inventory, assignment, attachment, and the root-proxy rewrite.
///
/// `package_group` is the credential bundle's fallback group, if one was
/// resolved before planning.
pub fn build_plan(
    manifest: &Manifest,
    provider: &dyn BuildOutputProvider,
    package_group: Option<&str>,
) -> KpubResult<PublishPlan> {
    let base = assign::resolve_base(manifest, package_group)?;
    let drafts = inventory::enumerate(provider)?;
    let targets = assign::assign(&drafts, &base)?;

    let mut publications = Vec::with_capacity(targets.len());
    for target in targets {
        let artifacts = attach::attach(&target, provider)?;
        let pom = build_pom(manifest, &target, &artifacts)?;
        publications.push(Publication {
            target,
            artifacts,
            pom,
        });
    }

    let mut plan = PublishPlan {
        publications,
        descriptor_dependencies: descriptor_dependencies(manifest)?,
        proxied_target: None,
    };
    if let Some(name) = &manifest.publication.platform_in_root {
        let config = RootProxyConfig {
            target_name: name.clone(),
            mode: manifest.publication.root_proxy_mode,
        };
        root_proxy::apply(&mut plan.publications, &config)?;
        plan.proxied_target = Some(name.clone());
    }
    Ok(plan)
}

/// Builds one publication's POM from the manifest metadata.
pub fn build_pom(
    manifest: &Manifest,
    target: &PublicationTarget,
    artifacts: &[AttachedArtifact],
) -> KpubResult<PomDocument> {
    let publication = &manifest.publication;
    let mut pom = PomDocument::new(target.coordinates.clone());
    pom.packaging = packaging_for(target.platform, artifacts);
    pom.name = Some(target.coordinates.artifact_id.clone());
    pom.description = manifest.project.description.clone();
    pom.url = publication.resolved_project_url();
    pom.licenses = publication
        .resolved_licenses()?
        .into_iter()
        .map(|l| License {
            name: l.name,
            url: l.url,
        })
        .collect();
    pom.developers = publication
        .resolved_developers()
        .into_iter()
        .map(|d| Developer {
            id: d.id,
            name: d.name,
            email: d.email,
            url: d.url,
        })
        .collect();
    let scm_url = publication.resolved_project_url();
    let scm_connection = publication.resolved_scm_connection();
    pom.scm = if scm_url.is_none() && scm_connection.is_none() {
        None
    } else {
        Some(Scm {
            url: scm_url,
            connection: scm_connection,
        })
    };
    pom.dependencies = manifest
        .dependencies
        .iter()
        .map(|(name, dependency)| pom_dependency(name, dependency))
        .collect::<KpubResult<Vec<_>>>()?;
    Ok(pom)
}

/// Maven `packaging` for a publication, from what it actually ships.
///
/// The default `jar` is spelled by omission. A publication with no primary
/// binary (common modules, web targets) is `pom`-packaged.
fn packaging_for(platform: PlatformKind, artifacts: &[AttachedArtifact]) -> Option<String> {
    if platform == PlatformKind::Common {
        return Some("pom".into());
    }
    match artifacts.iter().find(|a| a.kind == ArtifactKind::Primary) {
        Some(primary) if primary.extension != "jar" => Some(primary.extension.clone()),
        Some(_) => None,
        None => Some("pom".into()),
    }
}

fn descriptor_dependencies(manifest: &Manifest) -> KpubResult<Vec<VariantDependency>> {
    manifest
        .dependencies
        .iter()
        .map(|(name, dependency)| {
            let pom = pom_dependency(name, dependency)?;
            Ok(VariantDependency {
                group: pom.group_id,
                module: pom.artifact_id,
                version: VersionRequirement {
                    requires: pom.version,
                },
            })
        })
        .collect()
}

fn pom_dependency(name: &str, dependency: &Dependency) -> KpubResult<PomDependency> {
    match dependency {
        Dependency::Short(spec) => {
            let coordinates =
                kpub_core::coordinates::MavenCoordinates::parse(spec).ok_or_else(|| {
                    KpubError::Manifest {
                        message: format!(
                            "Invalid dependency `{name}`: expected \"group:artifact:version\", \
                             got `{spec}`"
                        ),
                    }
                })?;
            Ok(PomDependency {
                group_id: coordinates.group_id,
                artifact_id: coordinates.artifact_id,
                version: coordinates.version,
                scope: None,
                optional: false,
            })
        }
        Dependency::Detailed(detailed) => Ok(PomDependency {
            group_id: detailed.group.clone(),
            artifact_id: detailed.artifact.clone(),
            version: detailed.version.clone(),
            scope: detailed.scope.map(|s| scope_name(s).to_string()),
            optional: detailed.optional,
        }),
    }
}

fn scope_name(scope: DependencyScope) -> &'static str {
    match scope {
        DependencyScope::Compile => "compile",
        DependencyScope::Runtime => "runtime",
        DependencyScope::Provided => "provided",
        DependencyScope::Test => "test",
    }
}
