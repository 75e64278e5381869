//! Enumerates the publication targets a build produced.
//!
//! Single-platform builds (exactly one JVM target) publish that target
//! under the root coordinates. Multi-platform builds publish one module
//! per target plus a common module that owns the root coordinates; when
//! the build does not declare a common target itself, one is synthesized.

use kpub_core::platform::PlatformKind;
use kpub_core::provider::BuildOutputProvider;
use kpub_core::target::TargetDraft;
use kpub_util::errors::{KpubError, KpubResult};

/// Name given to the synthesized metadata target of a multi-platform
/// build that did not declare one.
pub const SYNTHESIZED_COMMON: &str = "common";

/// Turns the provider's target list into publication drafts.
///
/// The returned order is the declaration order of the provider, with the
/// root-equivalent draft always last. Repeated calls on the same provider
/// yield the same drafts.
pub fn enumerate(provider: &dyn BuildOutputProvider) -> KpubResult<Vec<TargetDraft>> {
    let names = provider.list_targets();
    if names.is_empty() {
        return Err(KpubError::Generic {
            message: "The build declared no publication targets".into(),
        }
        .into());
    }

    if names.len() == 1 && PlatformKind::classify(&names[0]) == PlatformKind::Jvm {
        tracing::debug!("Single-platform build with target {}", names[0]);
        return Ok(vec![
            TargetDraft::new(&names[0], PlatformKind::Jvm).root_equivalent()
        ]);
    }

    let mut drafts = Vec::with_capacity(names.len() + 1);
    let mut common: Option<TargetDraft> = None;
    for name in &names {
        let platform = PlatformKind::classify(name);
        if platform == PlatformKind::Common {
            if let Some(existing) = &common {
                return Err(KpubError::Generic {
                    message: format!(
                        "Multiple metadata targets declared: `{}` and `{name}`",
                        existing.name
                    ),
                }
                .into());
            }
            common = Some(TargetDraft::new(name, platform).root_equivalent());
        } else {
            drafts.push(TargetDraft::new(name, platform));
        }
    }

    // The root module is staged last so its descriptor can reference the
    // platform modules already in place.
    drafts.push(
        common.unwrap_or_else(|| {
            TargetDraft::new(SYNTHESIZED_COMMON, PlatformKind::Common).root_equivalent()
        }),
    );
    tracing::debug!("Multi-platform build with {} targets", drafts.len());
    Ok(drafts)
}
