use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Fill a tempfile next to `path` so it can be linked into place in one step.
fn staged(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Replace `path` with `data`. Readers see the old manifest or the new one,
/// never a torn write.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    staged(path, data)?.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `data` to `path` only if nothing exists there yet.
///
/// Two writers racing for the same path cannot both succeed. Returns `false`
/// when the path was already taken; the existing file is left untouched.
pub fn create_exclusive(path: &Path, data: &[u8]) -> Result<bool> {
    match staged(path, data)?.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.yaml");
        atomic_write(&path, b"v: 1").unwrap();
        atomic_write(&path, b"v: 2").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v: 2");
    }

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/manifest.yaml");
        atomic_write(&path, b"data").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn create_exclusive_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p/manifest.yaml");
        assert!(create_exclusive(&path, b"first").unwrap());
        assert!(!create_exclusive(&path, b"second").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn create_exclusive_leaves_no_stray_tempfiles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.yaml");
        create_exclusive(&path, b"first").unwrap();
        create_exclusive(&path, b"second").unwrap();
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
