use crate::error::{Result, ScanError};

/// Maximum nesting depth for archive-within-archive recursion
pub const MAX_ARCHIVE_DEPTH: usize = 16;
/// Maximum bytes accumulated along one chain of nested archives (4 GiB)
pub const MAX_CHAIN_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Extensions of entries that are opened as nested archives
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "war", "ear", "zip", "jmod"];

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
pub const MAIN_CLASS_KEY: &str = "Main-Class";
pub const IMPLEMENTATION_VERSION_KEY: &str = "Implementation-Version";
/// Longest manifest line accepted, excluding the line ending
pub const MAX_MANIFEST_LINE: usize = 64 * 1024;

pub const CLASS_EXTENSION: &str = ".class";
pub const LOOKUP_CLASS_MARKER: &str = "JndiLookup.class";
pub const MANAGER_CLASS_MARKER: &str = "JndiManager.class";
/// Constructor signature is only checked in paths containing this
pub const MANAGER_NAME_MARKER: &str = "JndiManager";

/// Resource limits applied while walking an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Maximum nesting depth; the outermost archive is depth 0
    pub max_depth: usize,
    /// Byte budget along each recursion chain. Siblings do not add up.
    pub max_chain_bytes: u64,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self { max_depth: MAX_ARCHIVE_DEPTH, max_chain_bytes: MAX_CHAIN_BYTES }
    }
}

impl ScanLimits {
    /// Create new scan limits with validation
    pub fn new(max_depth: usize, max_chain_bytes: u64) -> Result<Self> {
        if max_chain_bytes == 0 {
            return Err(ScanError::configuration("max_chain_bytes must be greater than 0"));
        }
        Ok(Self { max_depth, max_chain_bytes })
    }

    /// Fails if reading `size` more bytes on a chain that has already consumed
    /// `consumed` would go over budget.
    pub(crate) fn check_chain(&self, path: &str, size: u64, consumed: u64) -> Result<()> {
        match consumed.checked_add(size) {
            Some(total) if total <= self.max_chain_bytes => Ok(()),
            _ => Err(ScanError::budget_exceeded(path, size, consumed, self.max_chain_bytes)),
        }
    }
}

/// Returns true if `path` has one of the nested archive extensions.
///
/// Only the final extension counts and matching is case-sensitive.
pub fn is_archive_path(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(i) => ARCHIVE_EXTENSIONS.contains(&&name[i + 1..]),
        None => false,
    }
}
