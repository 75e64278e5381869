use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use kpub_protocol::credentials::{
    encode_hex, PublicationCredentials, PGP_PRIVATE_KEY_BEGIN, PGP_PRIVATE_KEY_END,
    PGP_PUBLIC_KEY_BEGIN, PGP_PUBLIC_KEY_END,
};

const MANIFEST: &str = r#"[project]
name = "demo"
group = "com.example"
version = "1.0.0"

[publication]
github = "octocat/demo"
license = "Apache-2.0"
developer = "octocat"
"#;

fn kpub_cmd() -> Command {
    Command::cargo_bin("kpub").unwrap()
}

fn bundle() -> String {
    encode_hex(&PublicationCredentials {
        pgp_public_key: format!("{PGP_PUBLIC_KEY_BEGIN}\nmQENBF...\n{PGP_PUBLIC_KEY_END}"),
        pgp_private_key: format!("{PGP_PRIVATE_KEY_BEGIN}\nlQOYBF...\n{PGP_PRIVATE_KEY_END}"),
        repo_username: "ci-user".into(),
        repo_password: "ci-pass".into(),
        package_group: None,
    })
}

#[test]
fn test_check_passes_with_bundle_and_complete_manifest() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Kpub.toml"), MANIFEST).unwrap();

    kpub_cmd()
        .current_dir(tmp.path())
        .args(["check", "--credentials", &bundle()])
        .assert()
        .success()
        .stderr(predicate::str::contains("configuration is publishable"));
}

#[test]
fn test_check_reads_the_bundle_from_kpub_env() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Kpub.toml"), MANIFEST).unwrap();
    fs::write(
        tmp.path().join(".kpub.env"),
        format!("PUBLICATION_CREDENTIALS={}\n", bundle()),
    )
    .unwrap();

    kpub_cmd()
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("build property"));
}

#[test]
fn test_check_finds_the_manifest_from_a_subdirectory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Kpub.toml"), MANIFEST).unwrap();
    let nested = tmp.path().join("src/commonMain/kotlin");
    fs::create_dir_all(&nested).unwrap();

    kpub_cmd()
        .current_dir(&nested)
        .args(["check", "--credentials", &bundle()])
        .assert()
        .success()
        .stderr(predicate::str::contains("configuration is publishable"));
}

#[test]
fn test_check_fails_on_incomplete_metadata() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("Kpub.toml"),
        MANIFEST.replace("developer = \"octocat\"\n", ""),
    )
    .unwrap();

    kpub_cmd()
        .current_dir(tmp.path())
        .args(["check", "--credentials", &bundle()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("developers"));
}

#[test]
fn test_check_fails_without_any_bundle() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Kpub.toml"), MANIFEST).unwrap();

    kpub_cmd()
        .current_dir(tmp.path())
        .env_remove("PUBLICATION_CREDENTIALS")
        .env_remove("publication.credentials")
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no credential bundle"));
}

#[test]
fn test_check_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();

    kpub_cmd()
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .failure();
}
