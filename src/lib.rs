//! log4jscan - Static detection of vulnerable, activated log4j builds inside Java archives.
//!
//! Walks a JAR (or WAR/EAR/ZIP/JMOD) and every archive nested inside it,
//! matching class files against byte signatures for the JNDI lookup RCE
//! (CVE-2021-44228). Nothing is executed and bytecode is not parsed.
//!
//! # Example
//!
//! ```no_run
//! let report = log4jscan::parse_path("app.jar").unwrap();
//!
//! if report.vulnerable {
//!     println!("vulnerable: {} {}", report.main_class, report.version);
//! }
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod report;
pub mod signature;
mod state;
mod walker;


pub use config::ScanLimits;
pub use error::{Result, ScanError};
pub use fs::{ArchiveEntry, DirFs, EntryFs, EntryKind, SafeListing, ZipFs};
pub use report::Report;

use state::ScanState;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use walker::Walker;

/// Scan an archive's entry tree with the default limits.
///
/// Returns a complete report, or an error and no report at all.
pub fn parse<F: EntryFs>(fs: F) -> Result<Report> {
    parse_with_limits(fs, ScanLimits::default())
}

/// Scan an archive's entry tree with caller-provided limits.
pub fn parse_with_limits<F: EntryFs>(mut fs: F, limits: ScanLimits) -> Result<Report> {
    let mut state = ScanState::default();
    Walker::new(&mut state, limits).check_archive(&mut fs, 0, 0)?;

    let report = state.into_report();
    tracing::info!(
        "Scan complete: vulnerable={} main_class={:?} version={:?}",
        report.vulnerable,
        report.main_class,
        report.version
    );
    Ok(report)
}

/// Open a zip container from a reader and scan it.
///
/// Unlike nested archives, a top-level input that isn't a zip is an error.
pub fn parse_reader<R: Read + Seek>(reader: R) -> Result<Report> {
    let fs = ZipFs::new(reader).map_err(|e| ScanError::archive("<input>", e))?;
    parse(fs)
}

/// Scan an in-memory zip container.
pub fn parse_bytes(data: &[u8]) -> Result<Report> {
    parse_reader(Cursor::new(data))
}

/// Scan a file on disk, or a directory holding an already-extracted archive.
pub fn parse_path<P: AsRef<Path>>(path: P) -> Result<Report> {
    let path = path.as_ref();
    let display = path.display().to_string();
    tracing::debug!("Scanning {}", path.display());

    if path.is_dir() {
        return parse(DirFs::new(path));
    }
    let file = File::open(path).map_err(|e| ScanError::io("opening", display.as_str(), e))?;
    let fs = ZipFs::new(BufReader::new(file)).map_err(|e| ScanError::archive(display, e))?;
    parse(fs)
}
