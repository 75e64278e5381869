use std::path::Path;

use kpub_core::manifest::Manifest;
use kpub_core::provider::DirectoryOutputs;
use kpub_core::MANIFEST_FILE;
use kpub_protocol::lookup;
use kpub_publish::preview;

/// Print the publication preview report on stdout.
///
/// Credentials are optional here: a present bundle contributes its
/// package group to group-id resolution, but a missing one only matters
/// once `publish` needs to sign.
pub fn preview(project_dir: &Path, credentials: Option<&str>) -> miette::Result<()> {
    let manifest = Manifest::from_path(&project_dir.join(MANIFEST_FILE))?;
    let properties = Manifest::build_properties(project_dir);
    let package_group = lookup::find_credentials(credentials, &properties)?
        .and_then(|(_, credentials)| credentials.package_group);

    let provider = DirectoryOutputs::new(manifest.publication.build_outputs(project_dir));
    let report = preview::render(&manifest, &provider, package_group.as_deref())?;
    print!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[project]
name = "demo"
group = "com.example"
version = "1.0.0"
"#;

    #[test]
    fn renders_without_credentials() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let jvm = dir.path().join("build/publications/jvm");
        std::fs::create_dir_all(&jvm).unwrap();
        std::fs::write(jvm.join("demo-1.0.0.jar"), "jar").unwrap();
        preview(dir.path(), None).unwrap();
    }

    #[test]
    fn fails_when_the_build_declared_no_targets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let err = preview(dir.path(), None).unwrap_err();
        assert!(format!("{err}").contains("no publication targets"));
    }
}
