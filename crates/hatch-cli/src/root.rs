use std::path::{Path, PathBuf};

/// Resolve the platform root directory.
///
/// Priority:
/// 1. `--root` flag / `HATCH_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.hatch/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_marker_upward(&cwd, hatch_core::paths::HATCH_DIR).unwrap_or(cwd)
}

fn find_marker_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_hatch_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".hatch")).unwrap();
        let subdir = dir.path().join("docs/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        let found = find_marker_upward(&subdir, ".hatch").unwrap();
        assert_eq!(found, dir.path());
    }

    #[test]
    fn missing_marker_yields_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_marker_upward(dir.path(), ".hatch-nowhere").is_none());
    }
}
