use serde::{Deserialize, Serialize};

/// Result of scanning one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// A vulnerable log4j build is bundled and its lookup class is present.
    ///
    /// 2.15.x builds count as vulnerable.
    pub vulnerable: bool,
    /// `Main-Class` from the manifest, empty if not seen
    pub main_class: String,
    /// `Implementation-Version` from the manifest. This is the version of the
    /// scanned archive, not of log4j.
    pub version: String,
}
