//! [`EntryFs`] over an archive that has already been extracted to disk.

use super::{normalize_components, ArchiveEntry, EntryFs, EntryKind};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// An extracted entry tree rooted at a directory.
///
/// Symlinks are reported as [`EntryKind::Other`] and never followed.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        if path == "." {
            return Ok(self.root.clone());
        }
        let parts = normalize_components(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid path: {path}"))
        })?;
        let mut resolved = self.root.clone();
        resolved.extend(parts);
        Ok(resolved)
    }
}

impl EntryFs for DirFs {
    fn read_dir(&mut self, dir: &str) -> io::Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.resolve(dir)?)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type()?;
            let (kind, size) = if file_type.is_dir() {
                (EntryKind::Dir, 0)
            } else if file_type.is_file() {
                (EntryKind::File, entry.metadata()?.len())
            } else {
                (EntryKind::Other, 0)
            };
            entries.push(ArchiveEntry::new(name, kind, size));
        }
        Ok(entries)
    }

    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.resolve(path)?)?;
        Ok(Box::new(file))
    }
}
