use crate::engine::LOG_FILE_NAME;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively enumerates every regular file under `root`.
///
/// The list is fully materialized so the engine knows the total up front.
/// Unreadable subtrees are skipped rather than fatal. The rename log is
/// excluded so a run never tries to rename its own log.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() != OsStr::new(LOG_FILE_NAME))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collects_files_recursively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), b"a").unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("sub/b.bin"), b"b").unwrap();
        fs::write(dir.path().join("sub/deeper/c"), b"c").unwrap();

        let mut files = collect_files(dir.path());
        files.sort();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn directories_are_not_listed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("only/dirs/here")).unwrap();

        assert!(collect_files(dir.path()).is_empty());
    }

    #[test]
    fn rename_log_is_excluded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOG_FILE_NAME), b"RENAMED: a -> b\n").unwrap();
        fs::write(dir.path().join("data"), b"x").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("data"));
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nope");
        assert!(collect_files(&gone).is_empty());
    }
}
