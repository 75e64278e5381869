use std::collections::BTreeMap;

use kpub_util::errors::KpubResult;

use crate::credentials::{decode_hex, PublicationCredentials};

/// Canonical name under which the bundle is published to builds.
pub const CREDENTIALS_KEY: &str = "PUBLICATION_CREDENTIALS";
/// Legacy dotted spelling, still honored.
pub const CREDENTIALS_KEY_DOTTED: &str = "publication.credentials";

/// One place a credential bundle may be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A build property from `.kpub.env`.
    BuildProperty(String),
    /// A process environment variable.
    Environment(String),
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::BuildProperty(name) => write!(f, "build property `{name}`"),
            CredentialSource::Environment(name) => write!(f, "environment variable `{name}`"),
        }
    }
}

/// The default lookup order. Build properties win over the environment,
/// and the canonical spelling wins over the dotted one.
pub fn default_sources() -> Vec<CredentialSource> {
    vec![
        CredentialSource::BuildProperty(CREDENTIALS_KEY.into()),
        CredentialSource::BuildProperty(CREDENTIALS_KEY_DOTTED.into()),
        CredentialSource::Environment(CREDENTIALS_KEY.into()),
        CredentialSource::Environment(CREDENTIALS_KEY_DOTTED.into()),
    ]
}

/// Resolve the first source holding a non-blank value. Pure.
pub fn lookup_in(
    sources: &[CredentialSource],
    properties: &BTreeMap<String, String>,
    environment: &BTreeMap<String, String>,
) -> Option<(CredentialSource, String)> {
    for source in sources {
        let value = match source {
            CredentialSource::BuildProperty(name) => properties.get(name),
            CredentialSource::Environment(name) => environment.get(name),
        };
        if let Some(value) = value {
            if !value.trim().is_empty() {
                return Some((source.clone(), value.clone()));
            }
        }
    }
    None
}

/// Snapshot the process environment for [`lookup_in`].
pub fn environment_snapshot() -> BTreeMap<String, String> {
    std::env::vars().collect()
}

/// Locate and decode the credential bundle.
///
/// An explicit value (e.g. from a CLI flag) takes precedence over the
/// default source list. Returns `Ok(None)` when no source holds a value;
/// a present-but-malformed bundle is a hard error.
pub fn find_credentials(
    explicit: Option<&str>,
    properties: &BTreeMap<String, String>,
) -> KpubResult<Option<(String, PublicationCredentials)>> {
    if let Some(blob) = explicit {
        let creds = decode_hex(blob)?;
        return Ok(Some(("--credentials".into(), creds)));
    }
    let environment = environment_snapshot();
    match lookup_in(&default_sources(), properties, &environment) {
        Some((source, blob)) => {
            let creds = decode_hex(&blob)?;
            Ok(Some((source.to_string(), creds)))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_source_wins() {
        let properties = props(&[(CREDENTIALS_KEY, "aa"), (CREDENTIALS_KEY_DOTTED, "bb")]);
        let environment = props(&[(CREDENTIALS_KEY, "cc")]);
        let (source, value) =
            lookup_in(&default_sources(), &properties, &environment).unwrap();
        assert_eq!(
            source,
            CredentialSource::BuildProperty(CREDENTIALS_KEY.into())
        );
        assert_eq!(value, "aa");
    }

    #[test]
    fn every_adjacent_pair_respects_priority() {
        let sources = default_sources();
        for i in 0..sources.len() {
            for j in (i + 1)..sources.len() {
                let mut properties = BTreeMap::new();
                let mut environment = BTreeMap::new();
                for (rank, value) in [(i, "hi"), (j, "lo")] {
                    match &sources[rank] {
                        CredentialSource::BuildProperty(name) => {
                            properties.insert(name.clone(), value.to_string());
                        }
                        CredentialSource::Environment(name) => {
                            environment.insert(name.clone(), value.to_string());
                        }
                    }
                }
                let (_, value) = lookup_in(&sources, &properties, &environment).unwrap();
                assert_eq!(value, "hi", "source {i} must shadow source {j}");
            }
        }
    }

    #[test]
    fn blank_values_are_skipped() {
        let properties = props(&[(CREDENTIALS_KEY, "   ")]);
        let environment = props(&[(CREDENTIALS_KEY_DOTTED, "zz")]);
        let (source, value) =
            lookup_in(&default_sources(), &properties, &environment).unwrap();
        assert_eq!(
            source,
            CredentialSource::Environment(CREDENTIALS_KEY_DOTTED.into())
        );
        assert_eq!(value, "zz");
    }

    #[test]
    fn absent_everywhere_is_none() {
        assert!(lookup_in(&default_sources(), &BTreeMap::new(), &BTreeMap::new()).is_none());
    }

    #[test]
    fn explicit_malformed_bundle_is_fatal() {
        let err = find_credentials(Some("zz-not-hex"), &BTreeMap::new()).unwrap_err();
        assert!(format!("{err}").contains("Malformed credentials"));
    }

    #[test]
    fn explicit_value_wins_over_properties() {
        use crate::credentials::{encode_hex, PublicationCredentials};
        use crate::credentials::{
            PGP_PRIVATE_KEY_BEGIN, PGP_PRIVATE_KEY_END, PGP_PUBLIC_KEY_BEGIN, PGP_PUBLIC_KEY_END,
        };
        let good = PublicationCredentials {
            pgp_public_key: format!("{PGP_PUBLIC_KEY_BEGIN}\nx\n{PGP_PUBLIC_KEY_END}"),
            pgp_private_key: format!("{PGP_PRIVATE_KEY_BEGIN}\nx\n{PGP_PRIVATE_KEY_END}"),
            repo_username: "u".into(),
            repo_password: "p".into(),
            package_group: None,
        };
        let properties = props(&[(CREDENTIALS_KEY, "feedface")]);
        let (source, creds) = find_credentials(Some(&encode_hex(&good)), &properties)
            .unwrap()
            .unwrap();
        assert_eq!(source, "--credentials");
        assert_eq!(creds.repo_username, "u");
    }
}
