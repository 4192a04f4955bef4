//! Locate candidate database files under a directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ParsePalError, Result};

/// Recursively collect regular files under `root` whose extension matches
/// `extension` (case-insensitive, leading dot optional). Results are sorted.
///
/// Entries that cannot be read are skipped; a missing `root` is an error.
pub fn find_database_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| ParsePalError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(ParsePalError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let wanted = extension.trim().trim_start_matches('.').to_lowercase();
    let mut found = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            },
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().to_lowercase() == wanted);
        if matches {
            found.push(entry.into_path());
        }
    }

    found.sort();
    debug!(root = %root.display(), count = found.len(), "Database discovery finished");
    Ok(found)
}
