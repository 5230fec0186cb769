use crate::domain::errors::DiscoveryError;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_hidden_entry(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Recursively lists regular files under `root`, skipping dot-entries.
///
/// Hidden directories are pruned, so nothing beneath them is visited. The
/// root itself is never treated as hidden. Entries come back sorted by file
/// name at each level.
pub fn walk_visible_files(root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    info!("Walking directory: {}", root.display());

    let mut result = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_entry(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(DiscoveryError::Walk(e)),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        debug!("Found file: {}", entry.path().display());
        result.push(entry.into_path());
    }

    info!("Found {} files in {}", result.len(), root.display());
    Ok(result)
}

pub fn read_file_bytes(path: &Path) -> io::Result<Vec<u8>> {
    debug!("Reading file contents: {}", path.display());
    let contents = fs::read(path)?;
    debug!("Read {} bytes from file", contents.len());
    Ok(contents)
}
