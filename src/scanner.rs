use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

pub const LOG_EXTENSION: &str = "kif";

/// Recursively discover game logs under `root`, sorted by path.
///
/// Only regular files with a `.kif` extension are returned. Unreadable
/// directory entries are logged and skipped.
pub fn scan_logs(root: &Path) -> Vec<PathBuf> {
    let mut results: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(LOG_EXTENSION))
        .collect();

    results.sort();
    results
}

/// Base name of `path` as used for setting lookup and provenance.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
