//! CSV file discovery

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Check whether a path looks like a CSV file
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Recursively collect CSV files under a directory
pub fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_csv_file(path) {
            files.push(path.to_path_buf());
        }
    }

    // Sort by filename for consistent ordering
    files.sort_by(|a, b| {
        a.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .cmp(b.file_name().and_then(|n| n.to_str()).unwrap_or(""))
    });

    files
}
