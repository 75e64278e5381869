use std::path::{Path, PathBuf};

/// Nearest directory at or above `start` containing `filename`, or `None`
/// when the walk reaches the filesystem root without a hit.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(filename).is_file())
        .map(Path::to_path_buf)
}

/// Create `path` and any missing parents; succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}

/// Whether `path` is a directory with no entries at all.
pub fn dir_is_empty(path: &Path) -> std::io::Result<bool> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

/// Delete a directory tree (if present) and recreate it empty.
pub fn recreate_dir(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    std::fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_nonempty_dirs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(dir_is_empty(dir.path()).unwrap());
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        assert!(!dir_is_empty(dir.path()).unwrap());
    }

    #[test]
    fn recreate_wipes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("work");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("stale.bin"), "x").unwrap();

        recreate_dir(&target).unwrap();
        assert!(target.is_dir());
        assert!(dir_is_empty(&target).unwrap());
    }

    #[test]
    fn find_ancestor_locates_manifest_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Kpub.toml"), "").unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_ancestor_with(&nested, "Kpub.toml").unwrap();
        assert_eq!(found, dir.path());
    }
}
