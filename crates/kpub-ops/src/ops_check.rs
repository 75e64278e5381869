use std::path::Path;

use kpub_core::manifest::Manifest;
use kpub_core::MANIFEST_FILE;
use kpub_protocol::lookup;
use kpub_publish::assign;
use kpub_util::errors::KpubError;
use kpub_util::progress;

/// Verify that a publish would get past its configuration gates.
///
/// Checks three things in order: the credential bundle decodes and
/// validates, the publication metadata is complete, and a group id can
/// be resolved. Nothing is written.
pub fn check(project_dir: &Path, credentials: Option<&str>) -> miette::Result<()> {
    let manifest = Manifest::from_path(&project_dir.join(MANIFEST_FILE))?;
    progress::status(
        "Checking",
        &format!("{} v{}", manifest.project.name, manifest.project.version),
    );

    let properties = Manifest::build_properties(project_dir);
    let Some((source, credentials)) = lookup::find_credentials(credentials, &properties)? else {
        return Err(KpubError::InvalidCredentials {
            reason: format!(
                "no credential bundle found; set {} or pass --credentials",
                lookup::CREDENTIALS_KEY
            ),
        }
        .into());
    };
    credentials.validate()?;
    progress::status_info("Credentials", &format!("ok, from {source}"));

    manifest.publication.require_complete()?;
    let base = assign::resolve_base(&manifest, credentials.package_group.as_deref())?;
    progress::status_info(
        "Coordinates",
        &format!("{}:{}:{}", base.group_id, base.artifact_id, base.version),
    );

    progress::status("Finished", "configuration is publishable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use kpub_protocol::credentials::{
        encode_hex, PublicationCredentials, PGP_PRIVATE_KEY_BEGIN, PGP_PRIVATE_KEY_END,
        PGP_PUBLIC_KEY_BEGIN, PGP_PUBLIC_KEY_END,
    };

    const MANIFEST: &str = r#"
[project]
name = "demo"
group = "com.example"
version = "1.0.0"

[publication]
github = "octocat/demo"
license = "Apache-2.0"
developer = "octocat"
"#;

    fn bundle(package_group: Option<&str>) -> String {
        encode_hex(&PublicationCredentials {
            pgp_public_key: format!("{PGP_PUBLIC_KEY_BEGIN}\nmQENBF...\n{PGP_PUBLIC_KEY_END}"),
            pgp_private_key: format!("{PGP_PRIVATE_KEY_BEGIN}\nlQOYBF...\n{PGP_PRIVATE_KEY_END}"),
            repo_username: "ci-user".into(),
            repo_password: "ci-pass".into(),
            package_group: package_group.map(String::from),
        })
    }

    #[test]
    fn passes_with_explicit_bundle_and_complete_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        check(dir.path(), Some(&bundle(None))).unwrap();
    }

    #[test]
    fn finds_the_bundle_in_build_properties() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        std::fs::write(
            dir.path().join(".kpub.env"),
            format!("{}={}\n", lookup::CREDENTIALS_KEY, bundle(None)),
        )
        .unwrap();
        check(dir.path(), None).unwrap();
    }

    #[test]
    fn bundle_package_group_fills_a_missing_project_group() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            MANIFEST.replace("group = \"com.example\"\n", ""),
        )
        .unwrap();
        check(dir.path(), Some(&bundle(Some("io.github.octocat")))).unwrap();
    }

    #[test]
    fn incomplete_publication_names_the_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            MANIFEST.replace("developer = \"octocat\"\n", ""),
        )
        .unwrap();
        let err = check(dir.path(), Some(&bundle(None))).unwrap_err();
        assert!(format!("{err}").contains("developers"));
    }

    #[test]
    fn malformed_bundle_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let err = check(dir.path(), Some("zz")).unwrap_err();
        assert!(format!("{err}").contains("Malformed credentials"));
    }
}
