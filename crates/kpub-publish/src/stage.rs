//! Lays the publication plan out as a local Maven repository tree.
//!
//! Platform publications are staged first and the root last, so the root
//! module descriptor only ever references platform modules that are
//! already in place. Artifacts and POMs are queued for signing; module
//! descriptors are not signed.

use std::path::{Path, PathBuf};

use kpub_core::artifact::ArtifactKind;
use kpub_core::coordinates::MavenCoordinates;
use kpub_core::platform::PlatformKind;
use kpub_maven::checksum::FileChecksums;
use kpub_maven::descriptor::{self, VariantFile};
use kpub_maven::layout::StagingRepository;
use kpub_util::errors::{KpubError, KpubResult};

use crate::plan::{Publication, PublishPlan};

/// Staging switches from the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageOptions {
    /// Also write `.md5`/`.sha1`/`.sha256`/`.sha512` sidecars.
    pub checksums: bool,
}

/// Paths written by one staging pass.
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    /// Staged artifacts and POMs, in staging order. Every entry gets a
    /// detached signature.
    pub to_sign: Vec<PathBuf>,
    /// Module descriptors, root last.
    pub descriptors: Vec<PathBuf>,
}

/// Stages every publication of the plan into `repository`.
pub fn stage(
    plan: &PublishPlan,
    repository: &StagingRepository,
    options: &StageOptions,
) -> KpubResult<StageOutcome> {
    let mut outcome = StageOutcome::default();
    let mut staged_platforms: Vec<(String, MavenCoordinates, PlatformKind)> = Vec::new();

    for publication in plan.publications.iter().filter(|p| !p.target.root_equivalent) {
        stage_publication(publication, plan, repository, options, None, &mut outcome)?;
        staged_platforms.push((
            publication.target.name.clone(),
            publication.target.coordinates.clone(),
            publication.target.platform,
        ));
    }

    let root = plan.root().ok_or_else(|| {
        miette::Report::from(KpubError::Generic {
            message: "Publication plan has no root module".into(),
        })
    })?;
    let redirects = plan
        .is_multiplatform()
        .then_some(staged_platforms.as_slice());
    stage_publication(root, plan, repository, options, redirects, &mut outcome)?;
    Ok(outcome)
}

fn stage_publication(
    publication: &Publication,
    plan: &PublishPlan,
    repository: &StagingRepository,
    options: &StageOptions,
    redirects: Option<&[(String, MavenCoordinates, PlatformKind)]>,
    outcome: &mut StageOutcome,
) -> KpubResult<()> {
    let coordinates = &publication.target.coordinates;
    let mut files: Vec<(ArtifactKind, VariantFile)> = Vec::new();

    for artifact in &publication.artifacts {
        let staged = repository.import_file(
            coordinates,
            artifact.kind.classifier(),
            &artifact.extension,
            &artifact.file,
        )?;
        let sums = FileChecksums::compute(&staged)?;
        if options.checksums {
            sums.write_sidecars(&staged)?;
        }
        files.push((artifact.kind, VariantFile::from_checksums(file_name(&staged), &sums)));
        outcome.to_sign.push(staged);
    }

    let pom = repository.write_file(coordinates, None, "pom", &publication.pom.to_xml()?)?;
    if options.checksums {
        FileChecksums::compute(&pom)?.write_sidecars(&pom)?;
    }
    outcome.to_sign.push(pom);

    let module = match redirects {
        Some(platforms) => descriptor::root_module(coordinates, platforms),
        None => descriptor::platform_module(
            coordinates,
            publication.target.platform,
            &files,
            &plan.descriptor_dependencies,
        ),
    };
    let module_path = repository.write_file(coordinates, None, "module", &module.to_json()?)?;
    if options.checksums {
        FileChecksums::compute(&module_path)?.write_sidecars(&module_path)?;
    }
    outcome.descriptors.push(module_path);
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpub_core::manifest::Manifest;
    use kpub_core::provider::StaticOutputs;
    use kpub_maven::descriptor::ModuleDescriptor;
    use kpub_maven::pom::parse_pom;

    use crate::plan::build_plan;

    const MANIFEST: &str = r#"
        [project]
        name = "demo"
        group = "com.example"
        version = "1.0.0"

        [publication]
        github = "octocat/demo"
        license = "MIT"
        developer = "octocat"
    "#;

    fn jvm_fixture(dir: &Path) -> StaticOutputs {
        let out = dir.join("out");
        std::fs::create_dir_all(&out).unwrap();
        for name in ["demo.jar", "demo-sources.jar", "demo-javadoc.jar"] {
            std::fs::write(out.join(name), name).unwrap();
        }
        StaticOutputs::new()
            .artifact("jvm", ArtifactKind::Primary, out.join("demo.jar"))
            .artifact("jvm", ArtifactKind::Sources, out.join("demo-sources.jar"))
            .artifact("jvm", ArtifactKind::Javadoc, out.join("demo-javadoc.jar"))
    }

    #[test]
    fn single_jvm_stages_the_exact_file_set() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = jvm_fixture(dir.path());
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        let plan = build_plan(&manifest, &outputs, None).unwrap();
        let repository = StagingRepository::new(dir.path().join("repo"));

        let outcome = stage(&plan, &repository, &StageOptions::default()).unwrap();

        let coordinates = MavenCoordinates::new("com.example", "demo", "1.0.0");
        assert_eq!(
            repository.list_files(&coordinates),
            [
                "demo-1.0.0-javadoc.jar",
                "demo-1.0.0-sources.jar",
                "demo-1.0.0.jar",
                "demo-1.0.0.module",
                "demo-1.0.0.pom",
            ]
        );
        assert_eq!(outcome.to_sign.len(), 4);
        assert_eq!(outcome.descriptors.len(), 1);
        // Descriptors are never queued for signing.
        assert!(outcome.to_sign.iter().all(|p| !p.ends_with("demo-1.0.0.module")));
    }

    #[test]
    fn checksum_sidecars_are_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = jvm_fixture(dir.path());
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        let plan = build_plan(&manifest, &outputs, None).unwrap();
        let coordinates = MavenCoordinates::new("com.example", "demo", "1.0.0");

        let plain = StagingRepository::new(dir.path().join("plain"));
        stage(&plan, &plain, &StageOptions::default()).unwrap();
        assert!(plain
            .list_files(&coordinates)
            .iter()
            .all(|f| !f.ends_with(".sha256")));

        let with_sums = StagingRepository::new(dir.path().join("sums"));
        stage(&plan, &with_sums, &StageOptions { checksums: true }).unwrap();
        let files = with_sums.list_files(&coordinates);
        for name in [
            "demo-1.0.0.jar.sha256",
            "demo-1.0.0.pom.md5",
            "demo-1.0.0.module.sha512",
        ] {
            assert!(files.iter().any(|f| f == name), "missing {name}");
        }
    }

    #[test]
    fn staged_pom_round_trips_with_the_plan() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = jvm_fixture(dir.path());
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        let plan = build_plan(&manifest, &outputs, None).unwrap();
        let repository = StagingRepository::new(dir.path().join("repo"));
        stage(&plan, &repository, &StageOptions::default()).unwrap();

        let coordinates = MavenCoordinates::new("com.example", "demo", "1.0.0");
        let pom_path = repository.file_path(&coordinates, None, "pom");
        let parsed = parse_pom(&std::fs::read_to_string(pom_path).unwrap()).unwrap();
        assert_eq!(parsed, plan.root().unwrap().pom);
        assert_eq!(parsed.licenses[0].name, "MIT");
    }

    #[test]
    fn multiplatform_root_descriptor_is_staged_last_and_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("native");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("demo.klib"), "klib").unwrap();
        std::fs::write(out.join("demo-javadoc.jar"), "doc").unwrap();
        std::fs::write(out.join("demo-common-sources.jar"), "src").unwrap();

        let outputs = jvm_fixture(dir.path())
            .artifact("linuxX64", ArtifactKind::Primary, out.join("demo.klib"))
            .artifact("linuxX64", ArtifactKind::Javadoc, out.join("demo-javadoc.jar"))
            .artifact("common", ArtifactKind::Sources, out.join("demo-common-sources.jar"));
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        let plan = build_plan(&manifest, &outputs, None).unwrap();
        let repository = StagingRepository::new(dir.path().join("repo"));

        let outcome = stage(&plan, &repository, &StageOptions::default()).unwrap();

        let root_module = outcome.descriptors.last().unwrap();
        assert!(root_module.ends_with("com/example/demo/1.0.0/demo-1.0.0.module"));
        let descriptor =
            ModuleDescriptor::from_json(&std::fs::read_to_string(root_module).unwrap()).unwrap();
        assert_eq!(descriptor.component.module, "demo");
        let redirect = descriptor.variants[0].available_at.as_ref().unwrap();
        assert!(redirect.url.contains("demo-jvm"));

        // Platform publications landed under their suffixed ids.
        let jvm = MavenCoordinates::new("com.example", "demo-jvm", "1.0.0");
        assert!(repository
            .list_files(&jvm)
            .contains(&"demo-jvm-1.0.0.jar".to_string()));
        let native = MavenCoordinates::new("com.example", "demo-linuxx64", "1.0.0");
        assert!(repository
            .list_files(&native)
            .contains(&"demo-linuxx64-1.0.0.klib".to_string()));
    }
}
