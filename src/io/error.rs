//! Error types for target loading, digit sourcing and search persistence

use std::fmt;
use std::path::PathBuf;

/// Main error type for all search operations
#[derive(Debug)]
pub enum SearchError {
    /// Failed to load the target image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Target image has more pixels than the configured ceiling
    ImageTooLarge {
        /// Pixel count of the target
        pixels: usize,
        /// Configured ceiling
        max_pixels: usize,
    },

    /// Target image cannot be reduced to the supported number of colors
    TooManyColors {
        /// Number of colors left after quantization (or found, if none was applied)
        found: usize,
        /// Supported maximum
        max: usize,
    },

    /// The digit source could not deliver digits right now
    ///
    /// Transient: callers retry with backoff before giving up.
    SourceUnavailable {
        /// Digit index of the failed request
        offset: u64,
        /// Description of the failure
        reason: String,
    },

    /// The digit source has no digits at or beyond the requested index
    SourceExhausted {
        /// Digit index that was requested
        offset: u64,
    },

    /// Local digit archive is malformed
    CorruptArchive {
        /// Archive path
        path: PathBuf,
        /// Description of the problem
        reason: String,
    },

    /// Failed to encode or decode the persisted search state
    StateFile {
        /// State file path
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
    },

    /// Persisted search state belongs to a different target or configuration
    StateMismatch {
        /// State file path
        path: PathBuf,
        /// What differs
        reason: String,
    },

    /// The interrupt handler could not be installed
    SignalHandler {
        /// Description of the failure
        reason: String,
    },
}

impl SearchError {
    /// Whether retrying the same operation later may succeed
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageTooLarge { pixels, max_pixels } => {
                write!(
                    f,
                    "Target image has {pixels} pixels, more than the limit of {max_pixels}"
                )
            }
            Self::TooManyColors { found, max } => {
                write!(
                    f,
                    "Target image has {found} colors, more than the limit of {max}; \
                     choose a quantization mode or recolor the image"
                )
            }
            Self::SourceUnavailable { offset, reason } => {
                write!(f, "Digit source unavailable at digit {offset}: {reason}")
            }
            Self::SourceExhausted { offset } => {
                write!(f, "Digit source has no digits at index {offset}")
            }
            Self::CorruptArchive { path, reason } => {
                write!(f, "Corrupt digit archive '{}': {reason}", path.display())
            }
            Self::StateFile { path, source } => {
                write!(f, "Invalid state file '{}': {source}", path.display())
            }
            Self::StateMismatch { path, reason } => {
                write!(
                    f,
                    "State file '{}' does not match this search: {reason}",
                    path.display()
                )
            }
            Self::SignalHandler { reason } => {
                write!(f, "Failed to install interrupt handler: {reason}")
            }
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::StateFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for search results
pub type Result<T> = std::result::Result<T, SearchError>;

impl From<image::ImageError> for SearchError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SearchError {
    SearchError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error for the given path and operation
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> SearchError {
    SearchError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}

/// Create a transient source error
pub fn unavailable(offset: u64, reason: &impl ToString) -> SearchError {
    SearchError::SourceUnavailable {
        offset,
        reason: reason.to_string(),
    }
}

/// Create a corrupt archive error
pub fn corrupt_archive(path: impl Into<PathBuf>, reason: &impl ToString) -> SearchError {
    SearchError::CorruptArchive {
        path: path.into(),
        reason: reason.to_string(),
    }
}
