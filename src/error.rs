use thiserror::Error;
use zip::result::ZipError;

/// Errors that abort a scan. No partial report is produced when one of these is returned.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("reached max archive nesting depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    #[error("reading {path} ({size} bytes) would exceed the {limit} byte budget ({consumed} bytes already consumed)")]
    BudgetExceeded { path: String, size: u64, consumed: u64, limit: u64 },

    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing archive {path}: {source}")]
    Archive {
        path: String,
        #[source]
        source: ZipError,
    },

    #[error("checking nested archive {path}: {source}")]
    Nested {
        path: String,
        #[source]
        source: Box<ScanError>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    pub fn depth_exceeded(max_depth: usize) -> Self {
        Self::DepthExceeded { max_depth }
    }

    pub fn budget_exceeded<S: Into<String>>(path: S, size: u64, consumed: u64, limit: u64) -> Self {
        Self::BudgetExceeded { path: path.into(), size, consumed, limit }
    }

    pub fn io<S: Into<String>>(action: &'static str, path: S, source: std::io::Error) -> Self {
        Self::Io { action, path: path.into(), source }
    }

    pub fn archive<S: Into<String>>(path: S, source: ZipError) -> Self {
        Self::Archive { path: path.into(), source }
    }

    pub fn nested<S: Into<String>>(path: S, source: ScanError) -> Self {
        Self::Nested { path: path.into(), source: Box::new(source) }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// The error raised at the deepest nesting level, with all `Nested` wrappers removed.
    #[must_use]
    pub fn innermost(&self) -> &ScanError {
        let mut err = self;
        while let Self::Nested { source, .. } = err {
            err = source;
        }
        err
    }

    /// Returns true if the scan stopped because a depth or byte budget was hit
    #[must_use]
    pub fn is_resource_limit(&self) -> bool {
        matches!(self.innermost(), Self::DepthExceeded { .. } | Self::BudgetExceeded { .. })
    }
}
