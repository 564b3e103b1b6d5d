//! Error types for `SheetFind`

use std::path::PathBuf;

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of configuration error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `SheetFind` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `SheetFind`
///
/// `Io`, `Container`, `Manifest` and `Read` are scoped to a single file: the
/// search policy logs them and moves on. The rest abort the run before any
/// file is inspected.
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid compressed container
    #[error("Error: {} is not a valid spreadsheet container: {source}", .path.display())]
    Container {
        /// File that failed to open as an archive
        path:   PathBuf,
        /// Underlying archive error
        source: zip::result::ZipError,
    },

    /// Workbook manifest is absent or malformed
    #[error("Error: Invalid workbook manifest in {}: {reason}", .path.display())]
    Manifest {
        /// File whose manifest is unusable
        path:   PathBuf,
        /// What is wrong with the manifest
        reason: String,
    },

    /// Cell data could not be materialized
    #[error("Error: Cannot read cells of {}{}: {message}", .path.display(), sheet_suffix(.sheet.as_deref()))]
    Read {
        /// Workbook being scanned
        path:    PathBuf,
        /// Sheet being materialized, if the workbook itself opened
        sheet:   Option<String>,
        /// Reader error text
        message: String,
    },

    /// Directory depth exceeded the maximum limit
    #[error("Error: Maximum directory depth of 1000 exceeded")]
    DepthExceeded,

    /// File count exceeded the maximum limit
    #[error("Error: Maximum file count of 100,000 exceeded")]
    FileCountExceeded,

    /// Search root is missing or not a directory
    #[error("Error: Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Invalid caller input, with fixed-size message buffer
    #[error("Error: {0}")]
    Config(Box<ArrayString<MAX_ERROR_LENGTH>>),
}

fn sheet_suffix(sheet: Option<&str>) -> String {
    sheet.map_or_else(String::new, |name| format!(" (sheet '{name}')"))
}

impl Error {
    /// Create a new configuration error
    ///
    /// Messages longer than `MAX_ERROR_LENGTH` are truncated.
    pub fn config(msg: &str) -> Self {
        let mut buf = ArrayString::new();
        for c in msg.chars() {
            if buf.try_push(c).is_err() {
                break;
            }
        }
        Self::Config(Box::new(buf))
    }

    /// Create a manifest error for `path`
    pub fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Manifest { path: path.into(), reason: reason.into() }
    }

    /// Whether the error only concerns the file being processed
    #[must_use]
    pub const fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Container { .. } | Self::Manifest { .. } | Self::Read { .. }
        )
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("Error: {e}\nTip: Check file permissions and try again"),
            Self::Container { .. } => {
                format!("{self}\nTip: Only .xlsx and .xlsm workbooks can be inspected")
            },
            Self::Manifest { .. } | Self::Read { .. } => {
                format!("{self}\nTip: Open and re-save the file in a spreadsheet application")
            },
            Self::DepthExceeded => "Error: Directory structure too deep (max 1000 levels)\nTip: \
                                    Try searching a shallower directory"
                .to_owned(),
            Self::FileCountExceeded => "Error: Too many spreadsheets (max 100,000)\nTip: Try \
                                        searching a smaller directory"
                .to_owned(),
            Self::NotADirectory(_) => format!("{self}\nTip: Pass an existing directory to search"),
            Self::Config(msg) => format!("Error: {msg}\nTip: Run with --help to see usage"),
        }
    }
}
