mod walk;

pub use walk::scan_inventory;

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One file found during a scan. Identity is `name` within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub path: PathBuf,
}

impl FileRecord {
    /// Creation time of the file, or its modification time on filesystems
    /// that do not record creation.
    pub fn created(&self) -> io::Result<DateTime<Local>> {
        let metadata = fs::metadata(&self.path)?;
        let time = metadata.created().or_else(|_| metadata.modified())?;
        let created = DateTime::<Local>::from(time);
        debug!("File {} creation date: {}", self.path.display(), created);
        Ok(created)
    }
}

/// Result of scanning a source root: distinct names in walk order plus the
/// last path seen for each name.
#[derive(Debug, Default, Clone)]
pub struct Inventory {
    pub names: Vec<String>,
    pub paths: HashMap<String, PathBuf>,
}

impl Inventory {
    pub(crate) fn insert(&mut self, name: String, path: PathBuf) {
        if !self.paths.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.paths.insert(name, path);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    pub fn records(&self) -> impl Iterator<Item = FileRecord> + '_ {
        self.names.iter().filter_map(|name| {
            self.paths.get(name).map(|path| FileRecord {
                name: name.clone(),
                path: path.clone(),
            })
        })
    }
}
