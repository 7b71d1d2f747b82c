//! Command implementations.

pub mod config;
pub mod create;
pub mod delete;
pub mod list;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Reform files under the reform root, as paths relative to the media
/// root, optionally filtered by a substring of the file name.
///
/// Covers both the flat first-filter files and the per-filter
/// subdirectories of the placement convention.
pub fn reform_files(
    media_root: &Path,
    reform_root: &Path,
    contains: Option<&str>,
) -> Vec<PathBuf> {
    let full_root = media_root.join(reform_root);
    let mut files = Vec::new();
    for entry in WalkDir::new(&full_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(needle) = contains {
            if !entry.file_name().to_string_lossy().contains(needle) {
                continue;
            }
        }
        if let Ok(relative) = entry.path().strip_prefix(media_root) {
            files.push(relative.to_path_buf());
        }
    }
    files
}
