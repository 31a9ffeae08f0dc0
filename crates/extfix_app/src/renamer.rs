use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a single in-place rename attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The file was moved to a path with the corrected extension.
    Renamed { from: PathBuf, to: PathBuf },
    /// The extension was already correct; nothing was touched.
    Skipped,
    /// The move was refused or rejected; the original file is intact.
    Failed { path: PathBuf, reason: String },
}

/// Renames `path` in place so its extension matches the detected `format`.
///
/// The candidate path keeps the parent directory and stem and swaps the
/// extension. A pre-existing file at the candidate path is never
/// overwritten; that case is reported as `Failed` and both files survive.
/// Errors never propagate past this boundary.
pub fn apply(path: &Path, format: &str) -> RenameOutcome {
    let stem = match path.file_stem() {
        Some(stem) => stem.to_os_string(),
        None => {
            return RenameOutcome::Failed {
                path: path.to_path_buf(),
                reason: "path has no file name".to_owned(),
            }
        }
    };

    let mut file_name = stem;
    file_name.push(".");
    file_name.push(format);
    let candidate = path.with_file_name(&file_name);

    if candidate == path {
        return RenameOutcome::Skipped;
    }

    if candidate.exists() {
        return RenameOutcome::Failed {
            path: path.to_path_buf(),
            reason: format!("target already exists: {}", candidate.display()),
        };
    }

    match fs::rename(path, &candidate) {
        Ok(()) => RenameOutcome::Renamed {
            from: path.to_path_buf(),
            to: candidate,
        },
        Err(e) => RenameOutcome::Failed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    }
}
