//! Search configuration supplied by the caller

use crate::error::{Error, Result};
use crate::matcher::TargetSet;
use crate::types::DEFAULT_SIZE_THRESHOLD_MB;

/// What to look for and how far to go
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    targets:           Vec<String>,
    search_cells:      bool,
    size_threshold_mb: f64,
}

impl SearchConfig {
    /// Validate and build a configuration
    ///
    /// # Errors
    /// Returns `Error::Config` if:
    /// - `targets` is empty or contains an empty term
    /// - `size_threshold_mb` is negative or not finite
    pub fn new(targets: Vec<String>, search_cells: bool, size_threshold_mb: f64) -> Result<Self> {
        if targets.is_empty() {
            return Err(Error::config("At least one search term is required"));
        }
        if targets.iter().any(String::is_empty) {
            return Err(Error::config("Search terms must not be empty"));
        }
        if !size_threshold_mb.is_finite() || size_threshold_mb < 0.0 {
            return Err(Error::config("--size has to be a non-negative number of megabytes"));
        }

        Ok(Self { targets, search_cells, size_threshold_mb })
    }

    /// Sheet-name-only search with the default threshold
    ///
    /// # Errors
    /// Same as [`SearchConfig::new`].
    pub fn sheet_names_only(targets: Vec<String>) -> Result<Self> {
        Self::new(targets, false, DEFAULT_SIZE_THRESHOLD_MB)
    }

    /// Canonical target terms
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Whether cells are searched when sheet names fall short
    #[must_use]
    pub const fn search_cells(&self) -> bool {
        self.search_cells
    }

    /// Size in megabytes above which cell search needs confirmation
    #[must_use]
    pub const fn size_threshold_mb(&self) -> f64 {
        self.size_threshold_mb
    }

    /// Fresh working set for one file
    #[must_use]
    pub fn working_targets(&self) -> TargetSet {
        TargetSet::new(self.targets.iter().cloned())
    }
}

/// Parse a size threshold in megabytes, e.g. `"3.2"`
///
/// # Errors
/// Returns `Error::Config` if `input` is not a decimal number.
pub fn parse_size_threshold(input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::config(r#"--size has to be a decimal number of megabytes, e.g. "3.2""#))
}
