use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all kpub operations.
#[derive(Debug, Error, Diagnostic)]
pub enum KpubError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed manifest (e.g. Kpub.toml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Kpub.toml for syntax errors"))]
    Manifest { message: String },

    /// Credential bundle could not be decoded (bad hex, bad wire data,
    /// or a required field missing from the decoded record).
    #[error("Malformed credentials bundle: {message}")]
    #[diagnostic(help("Regenerate the bundle with `kpub bundle create`"))]
    MalformedCredentials { message: String },

    /// Credential bundle decoded but failed validation.
    #[error("Invalid credentials: {reason}")]
    InvalidCredentials { reason: String },

    /// A mandatory artifact was not produced by the build.
    #[error("Missing {kind} artifact for target `{target}`")]
    #[diagnostic(help(
        "Every declared artifact is mandatory for the central repository; build the target first"
    ))]
    MissingArtifact { target: String, kind: String },

    /// The configured root-proxy target does not match any publication.
    #[error("Unknown root-proxy target `{name}`{available}")]
    #[diagnostic(help("Set `platform-in-root` to one of the declared platform targets"))]
    UnknownProxyTarget { name: String, available: String },

    /// The signing working directory cannot be safely wiped.
    #[error("Unsafe working directory `{path}`: {reason}")]
    #[diagnostic(help(
        "The working directory is deleted on every publish; it must not exist, be empty, \
         or contain KEEP_THIS_DIR_EMPTY.txt"
    ))]
    UnsafeWorkingDir { path: String, reason: String },

    /// Required publication metadata is not configured.
    #[error("Publication is incomplete: {field} is not set")]
    #[diagnostic(help("{hint}"))]
    IncompletePublication { field: String, hint: String },

    /// The external signer failed or produced no signature.
    #[error("Signing failed: {message}")]
    Signing { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type KpubResult<T> = miette::Result<T>;
