//! [`EntryFs`] over a zip container (jar, war, ear, jmod, ...).

use super::{join_path, normalize_components, ArchiveEntry, EntryFs, EntryKind};
use std::collections::BTreeMap;
use std::io::{self, Read, Seek};
use tracing::{debug, trace};
use zip::result::ZipResult;
use zip::ZipArchive;

/// S_IFMT / S_IFLNK
const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// A zip archive viewed as a directory tree.
///
/// Zips only store flat entry names, so parent directories are synthesized.
/// Names that would escape the root (`..`) are left out of the tree.
pub struct ZipFs<R> {
    archive: ZipArchive<R>,
    tree: EntryTree,
}

impl<R: Read + Seek> ZipFs<R> {
    /// Read the central directory and index every entry.
    ///
    /// Fails with `ZipError::InvalidArchive` when the data is not a zip.
    pub fn new(reader: R) -> ZipResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let tree = EntryTree::index(&mut archive)?;
        debug!(
            "Indexed zip archive: {} entries, {} files",
            archive.len(),
            tree.files.len()
        );
        Ok(Self { archive, tree })
    }

    /// Number of raw entries in the central directory
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> EntryFs for ZipFs<R> {
    fn read_dir(&mut self, dir: &str) -> io::Result<Vec<ArchiveEntry>> {
        self.tree
            .dirs
            .get(dir)
            .map(|children| children.values().cloned().collect())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no such directory: {dir}"))
            })
    }

    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let index = *self.tree.files.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path}"))
        })?;
        let file = self.archive.by_index(index).map_err(io::Error::other)?;
        Ok(Box::new(file))
    }
}

/// Directory structure recovered from the flat list of entry names
#[derive(Debug, Default)]
struct EntryTree {
    /// Directory path -> children by name
    dirs: BTreeMap<String, BTreeMap<String, ArchiveEntry>>,
    /// File path -> index in the central directory
    files: BTreeMap<String, usize>,
}

impl EntryTree {
    fn index<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ZipResult<Self> {
        let mut tree = Self::default();
        tree.dirs.insert(".".to_string(), BTreeMap::new());

        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            let name = entry.name().to_string();
            let kind = if entry.is_dir() {
                EntryKind::Dir
            } else if entry.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
                EntryKind::Other
            } else {
                EntryKind::File
            };
            let size = entry.size();
            drop(entry);

            let Some(parts) = normalize_components(&name) else {
                debug!("Skipping zip entry with unusable name: {:?}", name);
                continue;
            };
            trace!("Entry {}: {} ({:?}, {} bytes)", i, name, kind, size);
            tree.insert(&parts, kind, size, i);
        }
        Ok(tree)
    }

    fn insert(&mut self, parts: &[&str], kind: EntryKind, size: u64, index: usize) {
        let mut dir = ".".to_string();
        for (depth, part) in parts.iter().enumerate() {
            let is_leaf = depth + 1 == parts.len();
            let path = join_path(&dir, part);

            let children = self.dirs.entry(dir).or_default();
            if is_leaf {
                match kind {
                    // An explicit directory entry replaces an earlier file of the same name
                    EntryKind::Dir => {
                        children.insert(part.to_string(), ArchiveEntry::new(*part, kind, 0));
                        self.dirs.entry(path.clone()).or_default();
                    }
                    EntryKind::File | EntryKind::Other => {
                        if !children.contains_key(*part) {
                            children.insert(part.to_string(), ArchiveEntry::new(*part, kind, size));
                            if kind == EntryKind::File {
                                self.files.insert(path.clone(), index);
                            }
                        }
                    }
                }
            } else {
                children.insert(part.to_string(), ArchiveEntry::new(*part, EntryKind::Dir, 0));
            }
            dir = path;
        }
    }
}
