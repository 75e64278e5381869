use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use kpub_core::manifest::Manifest;
use kpub_core::provider::DirectoryOutputs;
use kpub_core::MANIFEST_FILE;
use kpub_maven::layout::StagingRepository;
use kpub_protocol::lookup;
use kpub_publish::signing::{ArtifactSigner, GpgSigner};
use kpub_publish::stage::StageOptions;
use kpub_publish::{archives, inventory, plan, signing, stage};
use kpub_util::errors::{KpubError, KpubResult};
use kpub_util::progress;

/// Environment/property switch moving the signing working directory into
/// the system temp directory.
pub const USE_SYSTEM_TEMP: &str = "PUBLICATION_USE_SYSTEM_TEMP";
/// Legacy dotted spelling of [`USE_SYSTEM_TEMP`].
pub const USE_SYSTEM_TEMP_DOTTED: &str = "publication.use.system.temp";

/// Flags accepted by `kpub publish`.
#[derive(Debug, Default)]
pub struct PublishOptions {
    /// Explicit credential bundle, overriding the configured sources.
    pub credentials: Option<String>,
    /// Plan and validate, but stop before staging and signing.
    pub dry_run: bool,
}

/// Stage and sign the project into a local repository tree ready for
/// upload to the central portal.
///
/// The pipeline runs in a fixed order: credentials, metadata checks,
/// secondary-archive assembly, planning, working-directory preparation,
/// staging, signing. A dry run stops after planning; missing secondary
/// archives are still assembled into the build outputs so the plan
/// reflects a real publish.
pub fn publish(project_dir: &Path, options: &PublishOptions) -> miette::Result<()> {
    let manifest = Manifest::from_path(&project_dir.join(MANIFEST_FILE))?;
    progress::status(
        "Publishing",
        &format!("{} v{}", manifest.project.name, manifest.project.version),
    );

    let properties = Manifest::build_properties(project_dir);
    let Some((source, credentials)) =
        lookup::find_credentials(options.credentials.as_deref(), &properties)?
    else {
        return Err(KpubError::InvalidCredentials {
            reason: format!(
                "no credential bundle found; set {} or pass --credentials",
                lookup::CREDENTIALS_KEY
            ),
        }
        .into());
    };
    credentials.validate()?;
    progress::status_info("Credentials", &format!("from {source}"));
    manifest.publication.require_complete()?;

    let outputs_root = manifest.publication.build_outputs(project_dir);
    let drafts = inventory::enumerate(&DirectoryOutputs::new(&outputs_root))?;
    let file_stem = format!("{}-{}", manifest.project.name, manifest.project.version);
    let assembled = archives::assemble_missing(project_dir, &outputs_root, &drafts, &file_stem)?;
    if assembled > 0 {
        progress::status_info("Assembled", &format!("{assembled} secondary archive(s)"));
    }

    let provider = DirectoryOutputs::new(&outputs_root);
    let plan = plan::build_plan(&manifest, &provider, credentials.package_group.as_deref())?;
    progress::status(
        "Planned",
        &format!("{} publication(s)", plan.publications.len()),
    );

    if options.dry_run {
        progress::status_warn("DryRun", "stopping before staging and signing");
        return Ok(());
    }

    let working_dir = resolve_working_dir(project_dir, &manifest, &properties)?;
    signing::prepare_working_dir(&working_dir, &credentials)?;
    let signer = GpgSigner::prepare(&working_dir)?;

    let repository = StagingRepository::new(manifest.publication.staging_dir(project_dir));
    let stage_options = StageOptions {
        checksums: manifest.publication.checksums,
    };
    let outcome = stage::stage(&plan, &repository, &stage_options)?;
    progress::status(
        "Staged",
        &format!(
            "{} file(s) into {}",
            outcome.to_sign.len() + outcome.descriptors.len(),
            repository.root().display()
        ),
    );

    let bar = progress::file_bar(outcome.to_sign.len() as u64);
    let signatures = signing::sign_all(
        &outcome.to_sign,
        &ProgressSigner {
            inner: &signer,
            bar: &bar,
        },
    );
    bar.finish_and_clear();
    let signatures = signatures?;
    progress::status("Signed", &format!("{} file(s)", signatures.len()));

    progress::status(
        "Finished",
        &format!("repository ready at {}", repository.root().display()),
    );
    Ok(())
}

/// Wraps a signer with per-file progress reporting.
struct ProgressSigner<'a> {
    inner: &'a GpgSigner,
    bar: &'a ProgressBar,
}

impl ArtifactSigner for ProgressSigner<'_> {
    fn sign_detached(&self, file: &Path) -> KpubResult<PathBuf> {
        if let Some(name) = file.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
        let signature = self.inner.sign_detached(file)?;
        self.bar.inc(1);
        Ok(signature)
    }
}

fn resolve_working_dir(
    project_dir: &Path,
    manifest: &Manifest,
    properties: &BTreeMap<String, String>,
) -> KpubResult<PathBuf> {
    if use_system_temp(properties) {
        let dir = tempfile::Builder::new()
            .prefix("publishing-tmp")
            .tempdir()
            .map_err(KpubError::Io)?;
        let path = dir.keep();
        tracing::debug!("Using system temp working directory {}", path.display());
        return Ok(path);
    }
    Ok(manifest.publication.working_dir(project_dir))
}

fn use_system_temp(properties: &BTreeMap<String, String>) -> bool {
    for key in [USE_SYSTEM_TEMP, USE_SYSTEM_TEMP_DOTTED] {
        let from_properties = properties.get(key).is_some_and(|v| v.trim() == "true");
        let from_env = std::env::var(key).is_ok_and(|v| v.trim() == "true");
        if from_properties || from_env {
            return true;
        }
    }
    false
}
