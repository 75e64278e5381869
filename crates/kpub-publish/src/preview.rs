//! Renders the publication plan as a human-readable report.
//!
//! Preview never writes anything and never fails on an incomplete build:
//! missing artifacts are flagged inline so the report is usable while the
//! project is still being wired up.

use kpub_core::coordinates::MavenCoordinates;
use kpub_core::manifest::{Manifest, RootProxyMode};
use kpub_core::platform::PlatformKind;
use kpub_core::provider::BuildOutputProvider;
use kpub_core::target::PublicationTarget;
use kpub_util::errors::KpubResult;

use crate::{assign, inventory};

/// Renders the preview report for the current manifest and build outputs.
pub fn render(
    manifest: &Manifest,
    provider: &dyn BuildOutputProvider,
    package_group: Option<&str>,
) -> KpubResult<String> {
    let base = assign::resolve_base(manifest, package_group)?;
    let drafts = inventory::enumerate(provider)?;
    let targets = assign::assign(&drafts, &base)?;
    let root = targets.iter().find(|t| t.root_equivalent);

    let mut out = String::new();
    out.push_str("Publication Preview\n\n");
    if let Some(root) = root {
        out.push_str(&format!("Root module: {}\n", root.coordinates));
    }
    out.push_str("Targets:\n");
    for target in &targets {
        let mut note = target.platform.to_string();
        if target.root_equivalent {
            note.push_str(", root");
        }
        out.push_str(&format!(
            "  {:<20} {} ({note})\n",
            target.name, target.coordinates
        ));
    }

    let proxied = proxied_target(manifest, &targets);
    if let Some(name) = &manifest.publication.platform_in_root {
        match &proxied {
            Some(target) => {
                let mode = match manifest.publication.root_proxy_mode {
                    RootProxyMode::Inline => "inline",
                    RootProxyMode::DependencyOnly => "dependency-only",
                };
                out.push_str(&format!(
                    "Root proxies platform target `{}` ({mode}).\n",
                    target.name
                ));
            }
            None => out.push_str(&format!(
                "WARNING: root-proxy target `{name}` does not match any platform target.\n"
            )),
        }
    }

    if let Some(root) = root {
        out.push_str("\nGradle:\n");
        out.push_str(&format!("  implementation(\"{}\")\n", root.coordinates));
    }
    match maven_coordinates(manifest, &targets, proxied) {
        Some(coordinates) => {
            out.push_str("\nMaven (JVM consumers):\n");
            out.push_str(&maven_snippet(coordinates));
        }
        None => {
            out.push_str("\nNo JVM target: Maven consumers cannot use this library.\n");
        }
    }

    out.push_str("\nFiles:\n");
    for target in &targets {
        render_files(&mut out, target, provider);
    }

    out.push_str("\nPublication Preview End\n");
    Ok(out)
}

fn render_files(out: &mut String, target: &PublicationTarget, provider: &dyn BuildOutputProvider) {
    out.push_str(&format!("  {}:\n", target.coordinates.artifact_id));
    for &kind in target.platform.expected_kinds() {
        let found = provider.find_artifact(&target.name, kind);
        let extension = found
            .as_deref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .unwrap_or("jar")
            .to_string();
        let name = target
            .coordinates
            .artifact_file_name(kind.classifier(), &extension);
        if found.is_some() {
            out.push_str(&format!("    {name}\n"));
        } else {
            out.push_str(&format!("    {name}  MISSING ({})\n", kind.label()));
        }
    }
    for &kind in target.platform.optional_kinds() {
        if provider.find_artifact(&target.name, kind).is_some() {
            let name = target.coordinates.artifact_file_name(kind.classifier(), "jar");
            out.push_str(&format!("    {name}\n"));
        }
    }
    for extension in ["pom", "module"] {
        let name = target.coordinates.artifact_file_name(None, extension);
        out.push_str(&format!("    {name}\n"));
    }
}

fn proxied_target<'a>(
    manifest: &Manifest,
    targets: &'a [PublicationTarget],
) -> Option<&'a PublicationTarget> {
    let name = manifest.publication.platform_in_root.as_deref()?;
    targets
        .iter()
        .find(|t| !t.root_equivalent && t.name == name)
}

/// Coordinates a plain Maven consumer should depend on, if any work.
fn maven_coordinates<'a>(
    manifest: &Manifest,
    targets: &'a [PublicationTarget],
    proxied: Option<&'a PublicationTarget>,
) -> Option<&'a MavenCoordinates> {
    if proxied.is_some() && manifest.publication.root_proxy_mode == RootProxyMode::Inline {
        return targets
            .iter()
            .find(|t| t.root_equivalent)
            .map(|t| &t.coordinates);
    }
    targets
        .iter()
        .find(|t| t.platform == PlatformKind::Jvm)
        .map(|t| &t.coordinates)
}

fn maven_snippet(coordinates: &MavenCoordinates) -> String {
    format!(
        "  <dependency>\n      <groupId>{}</groupId>\n      <artifactId>{}</artifactId>\n      \
         <version>{}</version>\n  </dependency>\n",
        coordinates.group_id, coordinates.artifact_id, coordinates.version
    )
}
