use std::path::Path;

use kpub_core::manifest::Manifest;
use kpub_protocol::credentials::{decode_hex, encode_hex, PublicationCredentials};
use kpub_protocol::lookup;
use kpub_util::errors::{KpubError, KpubResult};
use kpub_util::progress;

/// Input file holding the repository account details, one value per line.
pub const SONATYPE_FILE: &str = "sonatype.txt";
/// Input file holding the ASCII-armored PGP public key.
pub const PUBLIC_KEY_EXPORT: &str = "keys.gpg.pub";
/// Input file holding the ASCII-armored PGP private key.
pub const PRIVATE_KEY_EXPORT: &str = "keys.gpg";
/// Output file the encoded bundle is written to.
pub const BUNDLE_FILE: &str = "credentials.txt";

const SONATYPE_TEMPLATE: &str = "\
# kpub bundle input. Three values, one per line, in this order:
#   1. repository username (e.g. a portal user token name)
#   2. repository password or token
#   3. package group granted to the account (optional)
";

/// Assemble a credential bundle from key exports and account details.
///
/// Reads `sonatype.txt`, `keys.gpg.pub`, and `keys.gpg` from `dir`,
/// validates the assembled record, and writes the encoded bundle to
/// `credentials.txt`. When `sonatype.txt` does not exist yet, a template
/// is written and the error explains what to fill in.
pub fn create(dir: &Path) -> miette::Result<()> {
    let sonatype = dir.join(SONATYPE_FILE);
    if !sonatype.is_file() {
        std::fs::write(&sonatype, SONATYPE_TEMPLATE).map_err(KpubError::Io)?;
        return Err(KpubError::Generic {
            message: format!(
                "{} was missing; a template has been written there. Fill in the username, \
                 password, and optional package group, export your signing key pair with \
                 `gpg --armor --export > {PUBLIC_KEY_EXPORT}` and \
                 `gpg --armor --export-secret-keys > {PRIVATE_KEY_EXPORT}`, then rerun",
                sonatype.display()
            ),
        }
        .into());
    }

    let account = std::fs::read_to_string(&sonatype).map_err(KpubError::Io)?;
    let values: Vec<&str> = account
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    let [username, password, rest @ ..] = values.as_slice() else {
        return Err(KpubError::Generic {
            message: format!(
                "{} must hold a username line and a password line",
                sonatype.display()
            ),
        }
        .into());
    };

    let credentials = PublicationCredentials {
        pgp_public_key: read_key(&dir.join(PUBLIC_KEY_EXPORT), "gpg --armor --export")?,
        pgp_private_key: read_key(
            &dir.join(PRIVATE_KEY_EXPORT),
            "gpg --armor --export-secret-keys",
        )?,
        repo_username: username.to_string(),
        repo_password: password.to_string(),
        package_group: rest.first().map(|group| group.to_string()),
    };
    credentials.validate()?;

    let bundle = dir.join(BUNDLE_FILE);
    std::fs::write(&bundle, format!("{}\n", encode_hex(&credentials))).map_err(KpubError::Io)?;
    progress::status("Created", &bundle.display().to_string());
    println!(
        "Store the bundle as a CI secret named {} and delete {} and {}.",
        lookup::CREDENTIALS_KEY,
        PRIVATE_KEY_EXPORT,
        SONATYPE_FILE
    );
    Ok(())
}

/// Decode a bundle and print a redacted summary.
///
/// `source` may be a path to a bundle file or the encoded text itself;
/// when omitted, `credentials.txt` in the project directory is tried
/// first, then the configured lookup sources. Secret values are never
/// echoed, only their shape.
pub fn inspect(project_dir: &Path, source: Option<&str>) -> miette::Result<()> {
    let blob = resolve_blob(project_dir, source)?;
    let credentials = decode_hex(&blob)?;
    credentials.validate()?;

    println!("username:      {}", redact(&credentials.repo_username));
    println!(
        "password:      [{} characters]",
        credentials.repo_password.chars().count()
    );
    println!("public key:    {}", key_summary(&credentials.pgp_public_key));
    println!(
        "private key:   {}",
        key_summary(&credentials.pgp_private_key)
    );
    match &credentials.package_group {
        Some(group) => println!("package group: {group}"),
        None => println!("package group: (not recorded)"),
    }
    Ok(())
}

fn read_key(path: &Path, export_command: &str) -> KpubResult<String> {
    if !path.is_file() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(KpubError::Generic {
            message: format!(
                "{} is missing; export it with `{export_command} > {name}`",
                path.display()
            ),
        }
        .into());
    }
    Ok(std::fs::read_to_string(path).map_err(KpubError::Io)?)
}

fn resolve_blob(project_dir: &Path, source: Option<&str>) -> KpubResult<String> {
    if let Some(source) = source {
        let path = Path::new(source);
        if path.is_file() {
            return Ok(std::fs::read_to_string(path).map_err(KpubError::Io)?);
        }
        return Ok(source.to_string());
    }
    let bundle = project_dir.join(BUNDLE_FILE);
    if bundle.is_file() {
        return Ok(std::fs::read_to_string(&bundle).map_err(KpubError::Io)?);
    }
    let properties = Manifest::build_properties(project_dir);
    let environment = lookup::environment_snapshot();
    match lookup::lookup_in(&lookup::default_sources(), &properties, &environment) {
        Some((found, blob)) => {
            progress::status_info("Source", &found.to_string());
            Ok(blob)
        }
        None => Err(KpubError::Generic {
            message: format!(
                "nothing to inspect: no {BUNDLE_FILE} here and no bundle in the configured sources"
            ),
        }
        .into()),
    }
}

fn redact(value: &str) -> String {
    let visible: String = value.chars().take(2).collect();
    format!("{visible}*** [{} characters]", value.chars().count())
}

fn key_summary(armored: &str) -> String {
    let first_line = armored.trim().lines().next().unwrap_or_default();
    format!("{first_line} [{} characters]", armored.chars().count())
}
