//! Fills in missing secondary archives before attachment.
//!
//! Builds are expected to produce their own sources/javadoc/samples
//! archives, but plain setups rarely do. For every expected kind the
//! output directory lacks, this assembles one from the project's
//! conventional source directories. Javadoc gets an empty placeholder
//! archive, which the central repository accepts. Primary binaries are
//! never synthesized.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use kpub_core::artifact::ArtifactKind;
use kpub_core::provider::{BuildOutputProvider, DirectoryOutputs};
use kpub_core::target::TargetDraft;
use kpub_util::errors::{KpubError, KpubResult};

/// Assembles archives for expected-but-missing artifact kinds.
///
/// Archives land in `<outputs_root>/<target>/` named
/// `<file_stem>-<classifier>.jar`, where the directory provider will pick
/// them up by suffix. Returns how many archives were written. Existing
/// files are never replaced.
pub fn assemble_missing(
    project_root: &Path,
    outputs_root: &Path,
    drafts: &[TargetDraft],
    file_stem: &str,
) -> KpubResult<usize> {
    let provider = DirectoryOutputs::new(outputs_root);
    let mut written = 0;
    for draft in drafts {
        let target_dir = outputs_root.join(&draft.name);
        for &kind in draft.platform.expected_kinds() {
            if provider.find_artifact(&draft.name, kind).is_some() {
                continue;
            }
            let roots = match kind {
                ArtifactKind::Sources => source_roots(project_root, &draft.name),
                ArtifactKind::SampleSources => sample_roots(project_root, &draft.name),
                ArtifactKind::Javadoc => Vec::new(),
                ArtifactKind::Primary | ArtifactKind::Metadata => continue,
            };
            if kind != ArtifactKind::Javadoc && roots.is_empty() {
                // No conventional sources to archive; attachment will
                // report the gap.
                continue;
            }
            let Some(classifier) = kind.classifier() else {
                continue;
            };
            kpub_util::fs::ensure_dir(&target_dir).map_err(KpubError::Io)?;
            let path = target_dir.join(format!("{file_stem}-{classifier}.jar"));
            write_archive(&path, &roots)?;
            tracing::debug!("Assembled {} for target {}", path.display(), draft.name);
            written += 1;
        }
    }
    Ok(written)
}

fn source_roots(project_root: &Path, target: &str) -> Vec<PathBuf> {
    let candidates = [
        project_root.join(format!("src/{target}Main/kotlin")),
        project_root.join("src/commonMain/kotlin"),
        project_root.join("src/main/kotlin"),
        project_root.join("src/main/java"),
    ];
    let mut roots = Vec::new();
    for candidate in candidates {
        if candidate.is_dir() && !roots.contains(&candidate) {
            roots.push(candidate);
        }
    }
    roots
}

fn sample_roots(project_root: &Path, target: &str) -> Vec<PathBuf> {
    let candidates = [
        project_root.join(format!("src/{target}Sample/kotlin")),
        project_root.join("src/commonSample/kotlin"),
        project_root.join("samples"),
    ];
    let mut roots = Vec::new();
    for candidate in candidates {
        if candidate.is_dir() && !roots.contains(&candidate) {
            roots.push(candidate);
        }
    }
    roots
}

/// Writes a deterministic archive: entries sorted by path, fixed
/// timestamps, forward-slash names. The same sources always produce the
/// same bytes, so repeated publishes stay reproducible.
fn write_archive(path: &Path, roots: &[PathBuf]) -> KpubResult<()> {
    let file = std::fs::File::create(path).map_err(KpubError::Io)?;
    let mut archive = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .last_modified_time(zip::DateTime::default());

    for root in roots {
        let mut files = Vec::new();
        collect_files(root, &mut files);
        for source in files {
            let Ok(relative) = source.strip_prefix(root) else {
                continue;
            };
            let name: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            archive
                .start_file(name.join("/"), options)
                .map_err(|e| archive_error(path, e))?;
            let content = std::fs::read(&source).map_err(KpubError::Io)?;
            archive.write_all(&content).map_err(KpubError::Io)?;
        }
    }
    archive.finish().map_err(|e| archive_error(path, e))?;
    Ok(())
}

fn archive_error(path: &Path, e: zip::result::ZipError) -> miette::Report {
    KpubError::Generic {
        message: format!("Failed to write archive {}: {e}", path.display()),
    }
    .into()
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            collect_files(&path, files);
        } else {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpub_core::platform::PlatformKind;

    fn archive_names(path: &Path) -> Vec<String> {
        let file = std::fs::File::open(path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn javadoc_placeholder_is_written_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = dir.path().join("build/publications");
        std::fs::create_dir_all(outputs.join("jvm")).unwrap();
        std::fs::write(outputs.join("jvm/demo.jar"), "binary").unwrap();
        std::fs::write(outputs.join("jvm/demo-sources.jar"), "sources").unwrap();

        let drafts = vec![TargetDraft::new("jvm", PlatformKind::Jvm).root_equivalent()];
        let written = assemble_missing(dir.path(), &outputs, &drafts, "demo").unwrap();

        assert_eq!(written, 1);
        let javadoc = outputs.join("jvm/demo-javadoc.jar");
        assert!(javadoc.is_file());
        assert!(archive_names(&javadoc).is_empty());
        // Existing archives are untouched.
        assert_eq!(
            std::fs::read_to_string(outputs.join("jvm/demo-sources.jar")).unwrap(),
            "sources"
        );
    }

    #[test]
    fn sources_are_archived_from_conventional_directories() {
        let dir = tempfile::tempdir().unwrap();
        let kotlin = dir.path().join("src/jvmMain/kotlin/com/example");
        std::fs::create_dir_all(&kotlin).unwrap();
        std::fs::write(kotlin.join("Lib.kt"), "class Lib").unwrap();
        let common = dir.path().join("src/commonMain/kotlin");
        std::fs::create_dir_all(&common).unwrap();
        std::fs::write(common.join("Shared.kt"), "expect class Shared").unwrap();

        let outputs = dir.path().join("build/publications");
        std::fs::create_dir_all(outputs.join("jvm")).unwrap();
        std::fs::write(outputs.join("jvm/demo.jar"), "binary").unwrap();

        let drafts = vec![TargetDraft::new("jvm", PlatformKind::Jvm).root_equivalent()];
        assemble_missing(dir.path(), &outputs, &drafts, "demo").unwrap();

        let names = archive_names(&outputs.join("jvm/demo-sources.jar"));
        assert_eq!(names, ["Shared.kt", "com/example/Lib.kt"]);
    }

    #[test]
    fn archives_are_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src/main/kotlin");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("B.kt"), "class B").unwrap();
        std::fs::write(src.join("A.kt"), "class A").unwrap();

        let first = dir.path().join("first.jar");
        let second = dir.path().join("second.jar");
        write_archive(&first, &[src.clone()]).unwrap();
        write_archive(&second, &[src]).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn no_conventional_sources_leaves_the_gap() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = dir.path().join("build/publications");
        std::fs::create_dir_all(outputs.join("jvm")).unwrap();
        std::fs::write(outputs.join("jvm/demo.jar"), "binary").unwrap();

        let drafts = vec![TargetDraft::new("jvm", PlatformKind::Jvm).root_equivalent()];
        let written = assemble_missing(dir.path(), &outputs, &drafts, "demo").unwrap();

        // Only the javadoc placeholder; sources stay missing.
        assert_eq!(written, 1);
        assert!(!outputs.join("jvm/demo-sources.jar").exists());
    }

    #[test]
    fn primary_binaries_are_never_synthesized() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = dir.path().join("build/publications");
        std::fs::create_dir_all(outputs.join("jvm")).unwrap();

        let drafts = vec![TargetDraft::new("jvm", PlatformKind::Jvm).root_equivalent()];
        assemble_missing(dir.path(), &outputs, &drafts, "demo").unwrap();
        assert!(!outputs.join("jvm/demo.jar").exists());
    }
}
