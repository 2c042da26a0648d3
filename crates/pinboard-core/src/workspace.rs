use std::path::{Path, PathBuf};

/// Walk up from `start` to the first directory containing `marker`.
pub fn find_town_root(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).exists())
        .map(Path::to_path_buf)
}

/// Resolve the town root from the current working directory.
pub fn find_from_cwd(marker: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_town_root(&cwd, marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_marker_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("mayor")).unwrap();
        fs::write(tmp.path().join("mayor/town.json"), "{}").unwrap();
        let nested = tmp.path().join("gastown/polecats/Toast");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_town_root(&nested, "mayor/town.json"),
            Some(tmp.path().to_path_buf())
        );
    }

    #[test]
    fn test_no_marker_means_no_root() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            find_town_root(tmp.path(), "mayor/town-marker-that-does-not-exist.json"),
            None
        );
    }
}
