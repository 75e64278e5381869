//! Rewrites the root publication so it transparently proxies one platform
//! target.
//!
//! Maven consumers cannot follow Gradle's variant redirects, so a bare
//! `group:artifact:version` dependency on a multi-platform library resolves
//! to nothing useful. Promoting a platform target into the root fixes that:
//! inline mode re-publishes the target's artifacts under the root id,
//! dependency-only mode keeps the root metadata-only with a single
//! compile-scope edge on the target.

use kpub_core::artifact::ArtifactKind;
use kpub_core::manifest::RootProxyMode;
use kpub_util::errors::{KpubError, KpubResult};

use crate::plan::Publication;

/// Root-proxy settings from `Kpub.toml`. Absent config means the feature
/// is disabled and the rewriter is never entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootProxyConfig {
    /// Declared name of the platform target to promote.
    pub target_name: String,
    pub mode: RootProxyMode,
}

/// Rewrites the root publication in place.
///
/// The proxied target's own publication is never touched; only the root's
/// artifact set and POM change. Fails before any mutation when the
/// configured name matches no platform target.
pub fn apply(publications: &mut [Publication], config: &RootProxyConfig) -> KpubResult<()> {
    let proxied_index = publications
        .iter()
        .position(|p| !p.target.root_equivalent && p.target.name == config.target_name)
        .ok_or_else(|| unknown_target(publications, &config.target_name))?;
    let root_index = publications
        .iter()
        .position(|p| p.target.root_equivalent)
        .ok_or_else(|| {
            miette::Report::from(KpubError::Generic {
                message: "Publication plan has no root module".into(),
            })
        })?;

    let root_coordinates = publications[root_index].target.coordinates.clone();
    let proxied = &publications[proxied_index];
    tracing::debug!(
        "Root proxies platform target {} ({:?})",
        proxied.target.name,
        config.mode
    );

    match config.mode {
        RootProxyMode::Inline => {
            let artifacts = proxied.artifacts.clone();
            let pom = proxied.pom.proxied_to(&root_coordinates);
            let root = &mut publications[root_index];
            root.artifacts = artifacts;
            root.pom = pom;
        }
        RootProxyMode::DependencyOnly => {
            let pom = proxied.pom.dependency_proxy(&root_coordinates);
            let root = &mut publications[root_index];
            root.artifacts.retain(|a| a.kind != ArtifactKind::Primary);
            root.pom = pom;
        }
    }
    Ok(())
}

fn unknown_target(publications: &[Publication], name: &str) -> miette::Report {
    let platform_targets: Vec<&str> = publications
        .iter()
        .filter(|p| !p.target.root_equivalent)
        .map(|p| p.target.name.as_str())
        .collect();
    let available = if platform_targets.is_empty() {
        " (no platform targets exist)".to_string()
    } else {
        format!(" (available: {})", platform_targets.join(", "))
    };
    KpubError::UnknownProxyTarget {
        name: name.to_string(),
        available,
    }
    .into()
}
