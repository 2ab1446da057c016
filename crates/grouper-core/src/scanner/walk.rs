use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::Inventory;
use crate::error::Error;

/// Recursive walk of `root`. Builds the name list (walk order, not sorted)
/// and the name → path map. An unreadable root fails the scan; unreadable
/// subdirectories are logged and skipped.
pub fn scan_inventory(root: &Path) -> Result<Inventory, Error> {
    if let Err(err) = fs::read_dir(root) {
        return Err(Error::Scan {
            path: root.to_path_buf(),
            source: err,
        });
    }

    let mut inventory = Inventory::default();

    for entry_result in WalkDir::new(root).min_depth(1) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                warn!("Skipping unreadable entry {}: {}", path, err);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.into_path();
        debug!("Found file: {}", path.display());
        inventory.insert(name, path);
    }

    Ok(inventory)
}
