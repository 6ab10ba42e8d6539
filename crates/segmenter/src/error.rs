use covgap_structure::StructureError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for segmentation operations
pub type Result<T> = std::result::Result<T, SegmentError>;

/// Errors that can occur while turning a coverage report into segments
#[derive(Error, Debug)]
pub enum SegmentError {
    /// The coverage report is missing or malformed
    #[error("Failed to load coverage report {path}: {reason}")]
    ReportLoad { path: String, reason: String },

    /// A source file named by the report does not exist
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Caller passed an argument outside its contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration file
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The structure of a source file could not be built
    #[error("Failed to build structure for {}: {source}", path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: StructureError,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SegmentError {
    /// Create a report load error
    pub fn report_load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ReportLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Map an IO error on a source file, singling out missing files
    pub(crate) fn source_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::SourceNotFound(path.into())
        } else {
            Self::IoError(err)
        }
    }
}
