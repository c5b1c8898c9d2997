//! Per-scan verdict accumulator.

use crate::config::{LOOKUP_CLASS_MARKER, MANAGER_CLASS_MARKER, MANAGER_NAME_MARKER};
use crate::manifest::ManifestFields;
use crate::report::Report;
use crate::signature::{matches_constructor_signature, matches_patched_marker};

/// Everything learned so far while walking one archive and its nested archives.
///
/// Owned by a single [`crate::parse`] call and threaded through the recursion
/// by mutable reference.
#[derive(Debug, Default)]
pub(crate) struct ScanState {
    /// A JndiLookup class was found
    has_lookup_class: bool,
    /// A JndiManager class still has the pre-2.15 constructor
    has_old_constructor_signature: bool,
    /// JndiManager.class was seen
    seen_manager_class: bool,
    /// The most recently seen JndiManager.class has the 2.16 marker.
    /// Meaningless unless `seen_manager_class` is set.
    is_patched_version: bool,

    main_class: String,
    version: String,
}

impl ScanState {
    /// The lookup class is present and either the manager has the old
    /// constructor (< 2.15) or the manager lacks the 2.16 marker (2.15.x).
    pub(crate) fn bad(&self) -> bool {
        (self.has_lookup_class && self.has_old_constructor_signature)
            || (self.has_lookup_class && self.seen_manager_class && !self.is_patched_version)
    }

    /// Nothing left to learn: the verdict is bad and the main class is known.
    pub(crate) fn done(&self) -> bool {
        self.bad() && !self.main_class.is_empty()
    }

    /// Record a class file at `path` (relative to its archive) with the given contents.
    pub(crate) fn observe_class(&mut self, path: &str, content: &[u8]) {
        if !self.has_lookup_class && path.contains(LOOKUP_CLASS_MARKER) {
            self.has_lookup_class = true;
        }
        if !self.has_old_constructor_signature {
            self.has_old_constructor_signature =
                path.contains(MANAGER_NAME_MARKER) && matches_constructor_signature(content);
        }
        if path.contains(MANAGER_CLASS_MARKER) {
            self.seen_manager_class = true;
            self.is_patched_version = matches_patched_marker(content);
        }
    }

    /// Overwrite metadata with whatever keys the manifest carried.
    pub(crate) fn observe_manifest(&mut self, fields: ManifestFields) {
        if let Some(main_class) = fields.main_class {
            self.main_class = main_class;
        }
        if let Some(version) = fields.version {
            self.version = version;
        }
    }

    pub(crate) fn into_report(self) -> Report {
        Report {
            vulnerable: self.bad(),
            main_class: self.main_class,
            version: self.version,
        }
    }
}
