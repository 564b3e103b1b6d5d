//! Common types and constants for `SheetFind`

use std::path::{Path, PathBuf};

/// Maximum directory depth allowed
pub const MAX_DEPTH: usize = 1_000;

/// Maximum number of spreadsheets to collect
pub const MAX_FILES: usize = 100_000;

/// Default size threshold above which cell search needs confirmation
pub const DEFAULT_SIZE_THRESHOLD_MB: f64 = 1.0;

/// Bytes per reported megabyte
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// A spreadsheet discovered on disk, together with its search result
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    id:               usize,
    path:             PathBuf,
    size_mb:          f64,
    values_found:     bool,
    skipped_for_size: bool,
    sheet_names:      Vec<String>,
}

impl CandidateFile {
    /// Create an unsearched candidate
    #[must_use]
    pub const fn new(id: usize, path: PathBuf, size_mb: f64) -> Self {
        Self {
            id,
            path,
            size_mb,
            values_found: false,
            skipped_for_size: false,
            sheet_names: Vec::new(),
        }
    }

    /// Create a candidate from its size in bytes
    #[must_use]
    pub fn from_bytes(id: usize, path: PathBuf, bytes: u64) -> Self {
        Self::new(id, path, size_in_mb(bytes))
    }

    /// Identifier assigned at discovery
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Absolute path of the spreadsheet
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in megabytes, one fraction digit
    #[must_use]
    pub const fn size_mb(&self) -> f64 {
        self.size_mb
    }

    /// Whether every target was found
    #[must_use]
    pub const fn values_found(&self) -> bool {
        self.values_found
    }

    /// Whether cell search was declined because of the file size
    #[must_use]
    pub const fn skipped_for_size(&self) -> bool {
        self.skipped_for_size
    }

    /// Sheet names read from the manifest, empty until inspected
    #[must_use]
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub(crate) fn set_sheet_names(&mut self, names: Vec<String>) {
        debug_assert!(self.sheet_names.is_empty(), "sheet names are populated once");
        self.sheet_names = names;
    }

    pub(crate) fn mark_found(&mut self) {
        self.values_found = true;
        self.skipped_for_size = false;
    }

    pub(crate) fn mark_skipped_for_size(&mut self) {
        self.skipped_for_size = true;
        self.values_found = false;
    }
}

/// Convert a byte count to megabytes rounded to one fraction digit
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn size_in_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 10.0).round() / 10.0
}

const _: () = {
    assert!(MAX_DEPTH > 0);
    assert!(MAX_FILES > 0);
};
