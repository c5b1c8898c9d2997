//! Recursive walk over an archive and the archives nested inside it.

use crate::config::{is_archive_path, ScanLimits, CLASS_EXTENSION, MANIFEST_PATH};
use crate::error::{Result, ScanError};
use crate::fs::{join_path, ArchiveEntry, EntryFs, EntryKind, SafeListing, ZipFs};
use crate::manifest::parse_manifest;
use crate::state::ScanState;
use std::io::{self, BufReader, Cursor, Read};
use tracing::{debug, trace};
use zip::result::ZipError;

/// Walks entries depth-first in name order and feeds [`ScanState`].
///
/// `chain_bytes` is what the current recursion chain has already consumed:
/// the declared sizes of the enclosing nested archives. Sibling entries do
/// not add to each other's budget.
pub(crate) struct Walker<'a> {
    state: &'a mut ScanState,
    limits: ScanLimits,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(state: &'a mut ScanState, limits: ScanLimits) -> Self {
        Self { state, limits }
    }

    pub(crate) fn check_archive(
        &mut self,
        fs: &mut dyn EntryFs,
        depth: usize,
        chain_bytes: u64,
    ) -> Result<()> {
        if depth > self.limits.max_depth {
            return Err(ScanError::depth_exceeded(self.limits.max_depth));
        }
        debug!("Checking archive at depth {} ({} bytes on chain)", depth, chain_bytes);

        let mut fs = SafeListing::new(fs);
        self.walk_dir(&mut fs, ".", depth, chain_bytes)
    }

    fn walk_dir(
        &mut self,
        fs: &mut dyn EntryFs,
        dir: &str,
        depth: usize,
        chain_bytes: u64,
    ) -> Result<()> {
        if self.state.done() {
            return Ok(());
        }
        let entries = fs
            .read_dir(dir)
            .map_err(|e| ScanError::io("reading directory", dir, e))?;

        for entry in entries {
            if self.state.done() {
                debug!("Verdict reached, skipping rest of {}", dir);
                break;
            }
            let path = join_path(dir, &entry.name);
            match entry.kind {
                EntryKind::Dir => self.walk_dir(fs, &path, depth, chain_bytes)?,
                EntryKind::File => self.visit_file(fs, &path, &entry, depth, chain_bytes)?,
                EntryKind::Other => {}
            }
        }
        Ok(())
    }

    fn visit_file(
        &mut self,
        fs: &mut dyn EntryFs,
        path: &str,
        entry: &ArchiveEntry,
        depth: usize,
        chain_bytes: u64,
    ) -> Result<()> {
        if path.ends_with(CLASS_EXTENSION) {
            return self.check_class(fs, path, entry.size, chain_bytes);
        }
        if path == MANIFEST_PATH {
            return self.check_manifest(fs, path);
        }
        if is_archive_path(path) {
            return self.check_nested(fs, path, entry.size, depth, chain_bytes);
        }
        Ok(())
    }

    fn check_class(
        &mut self,
        fs: &mut dyn EntryFs,
        path: &str,
        size: u64,
        chain_bytes: u64,
    ) -> Result<()> {
        if self.state.bad() {
            return Ok(());
        }
        self.limits.check_chain(path, size, chain_bytes)?;

        let reader = fs.open(path).map_err(|e| ScanError::io("opening file", path, e))?;
        let content = if size > 0 {
            read_limited(reader, size).map_err(|e| ScanError::io("reading file", path, e))?
        } else {
            // No declared size: bound the read by what's left of the budget
            let remaining = self.limits.max_chain_bytes.saturating_sub(chain_bytes);
            let content = read_limited(reader, remaining.saturating_add(1))
                .map_err(|e| ScanError::io("reading file", path, e))?;
            if content.len() as u64 > remaining {
                return Err(ScanError::budget_exceeded(
                    path,
                    content.len() as u64,
                    chain_bytes,
                    self.limits.max_chain_bytes,
                ));
            }
            content
        };

        trace!("Inspecting class {} ({} bytes)", path, content.len());
        self.state.observe_class(path, &content);
        Ok(())
    }

    fn check_manifest(&mut self, fs: &mut dyn EntryFs, path: &str) -> Result<()> {
        let reader = fs
            .open(path)
            .map_err(|e| ScanError::io("opening manifest file", path, e))?;
        let fields = parse_manifest(BufReader::new(reader))
            .map_err(|e| ScanError::io("scanning manifest file", path, e))?;
        self.state.observe_manifest(fields);
        Ok(())
    }

    fn check_nested(
        &mut self,
        fs: &mut dyn EntryFs,
        path: &str,
        size: u64,
        depth: usize,
        chain_bytes: u64,
    ) -> Result<()> {
        // Only nested archives count against the budget; the outermost one can be any size
        self.limits.check_chain(path, size, chain_bytes)?;

        let reader = fs.open(path).map_err(|e| ScanError::io("opening file", path, e))?;
        // Read one byte past the declared size so an understated header is caught
        let data = read_limited(reader, size.saturating_add(1))
            .map_err(|e| ScanError::io("reading file", path, e))?;
        if data.len() as u64 > size {
            let err = io::Error::new(
                io::ErrorKind::InvalidData,
                format!("entry is larger than its declared {size} bytes"),
            );
            return Err(ScanError::io("reading file", path, err));
        }

        let mut inner = match ZipFs::new(Cursor::new(data)) {
            Ok(inner) => inner,
            Err(ZipError::InvalidArchive(reason)) => {
                debug!("Skipping {}: not a zip archive ({})", path, reason);
                return Ok(());
            }
            Err(e) => return Err(ScanError::archive(path, e)),
        };

        debug!("Descending into nested archive {} ({} entries)", path, inner.len());
        self.check_archive(&mut inner, depth + 1, chain_bytes + size)
            .map_err(|e| ScanError::nested(path, e))
    }
}

/// Read at most `limit` bytes.
fn read_limited<R: Read>(reader: R, limit: u64) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.take(limit).read_to_end(&mut data)?;
    Ok(data)
}
