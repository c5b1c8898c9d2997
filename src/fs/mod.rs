//! Read-only view of an archive's entry tree.
//!
//! Paths are `/`-separated and relative to the archive root, which is `"."`.

mod dir_fs;
mod zip_fs;

pub use dir_fs::DirFs;
pub use zip_fs::ZipFs;

use std::io::{self, Read};

/// What kind of node an entry is. Only `File` entries are ever opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks and anything else that isn't a regular file or directory
    Other,
}

/// One child returned by [`EntryFs::read_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Base name, without the parent directory
    pub name: String,
    pub kind: EntryKind,
    /// Declared (uncompressed) size in bytes
    pub size: u64,
}

impl ArchiveEntry {
    pub fn new<S: Into<String>>(name: S, kind: EntryKind, size: u64) -> Self {
        Self { name: name.into(), kind, size }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// A virtual filesystem rooted at an archive's entry tree.
///
/// Methods take `&mut self` because archive readers seek on every open.
pub trait EntryFs {
    /// List the direct children of `dir`.
    fn read_dir(&mut self, dir: &str) -> io::Result<Vec<ArchiveEntry>>;

    /// Open a regular file for reading.
    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>>;
}

impl<F: EntryFs + ?Sized> EntryFs for &mut F {
    fn read_dir(&mut self, dir: &str) -> io::Result<Vec<ArchiveEntry>> {
        (**self).read_dir(dir)
    }

    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }
}

/// Listing wrapper used by the walker.
///
/// Some archive filesystems list a directory as one of its own children,
/// which turns a recursive walk into an infinite one. Every listing drops
/// children named after the queried directory and is sorted by name.
pub struct SafeListing<F> {
    inner: F,
}

impl<F: EntryFs> SafeListing<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: EntryFs> EntryFs for SafeListing<F> {
    fn read_dir(&mut self, dir: &str) -> io::Result<Vec<ArchiveEntry>> {
        let mut entries = self.inner.read_dir(dir)?;
        entries.retain(|e| e.name != dir);
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        self.inner.open(path)
    }
}

/// Join a child name onto its parent directory path.
pub(crate) fn join_path(dir: &str, name: &str) -> String {
    if dir == "." {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Split an entry name into normal components. Returns `None` for names that
/// escape the root or name nothing.
pub(crate) fn normalize_components(name: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    for part in name.split('/') {
        match part {
            "" | "." => {}
            ".." => return None,
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}
