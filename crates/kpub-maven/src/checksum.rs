//! Artifact checksums (SHA-512, SHA-256, SHA-1, MD5) for module
//! descriptors and optional repository sidecar files.

use std::io::Read;
use std::path::{Path, PathBuf};

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use kpub_util::errors::{KpubError, KpubResult};

/// Size and digests of one artifact file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChecksums {
    pub size: u64,
    pub sha512: String,
    pub sha256: String,
    pub sha1: String,
    pub md5: String,
}

impl FileChecksums {
    /// Compute all digests in a single streaming pass over the file.
    pub fn compute(path: &Path) -> KpubResult<Self> {
        let mut file = std::fs::File::open(path).map_err(KpubError::Io)?;
        let mut sha512 = Sha512::new();
        let mut sha256 = Sha256::new();
        let mut sha1 = Sha1::new();
        let mut md5 = Md5::new();
        let mut size: u64 = 0;
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = file.read(&mut buf).map_err(KpubError::Io)?;
            if n == 0 {
                break;
            }
            size += n as u64;
            sha512.update(&buf[..n]);
            sha256.update(&buf[..n]);
            sha1.update(&buf[..n]);
            md5.update(&buf[..n]);
        }
        Ok(Self {
            size,
            sha512: format!("{:x}", sha512.finalize()),
            sha256: format!("{:x}", sha256.finalize()),
            sha1: format!("{:x}", sha1.finalize()),
            md5: format!("{:x}", md5.finalize()),
        })
    }

    /// Write `.md5`/`.sha1`/`.sha256`/`.sha512` files next to `path`,
    /// each holding the bare hex digest. Returns the written paths.
    pub fn write_sidecars(&self, path: &Path) -> KpubResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(4);
        for (extension, digest) in [
            ("md5", &self.md5),
            ("sha1", &self.sha1),
            ("sha256", &self.sha256),
            ("sha512", &self.sha512),
        ] {
            let sidecar = sidecar_path(path, extension);
            std::fs::write(&sidecar, digest).map_err(KpubError::Io)?;
            written.push(sidecar);
        }
        Ok(written)
    }
}

fn sidecar_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}
