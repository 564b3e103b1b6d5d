//! Per-file search policy
//!
//! Each file goes through
//! `NotStarted -> SheetNamesChecked -> {Satisfied | CellsPending}` and, when
//! cells are pending, on to `Satisfied`, `SkippedForSize` or `Exhausted`.
//! Unreadable files end in `Failed` without affecting the rest of the run.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::inspector::list_sheet_names;
use crate::matcher::match_targets;
use crate::scanner::CellScanner;
use crate::types::CandidateFile;

/// Answer that accepts scanning a large file
pub const CONFIRM_TOKEN: &str = "y";

/// Whether an operator's answer accepts scanning a large file
///
/// Only the exact token counts: `"Y"`, `"yes"`, `"y "` and an empty answer
/// all decline.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer == CONFIRM_TOKEN
}

/// Asks whether a file above the size threshold should still be scanned
pub trait Confirm {
    /// Return `true` to scan the cells of `file`
    fn confirm(&mut self, file: &CandidateFile) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&CandidateFile) -> bool,
{
    fn confirm(&mut self, file: &CandidateFile) -> bool {
        self(file)
    }
}

/// Where a file is in its evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Not inspected yet
    NotStarted,
    /// Sheet names read and matched
    SheetNamesChecked,
    /// Targets remain and cell search was requested
    CellsPending,
    /// Every target was found
    Satisfied,
    /// Cell search declined because of the file size
    SkippedForSize,
    /// Targets remain after every permitted search
    Exhausted,
    /// The file could not be read
    Failed,
}

impl SearchState {
    /// Whether evaluation of the file is over
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Satisfied | Self::SkippedForSize | Self::Exhausted | Self::Failed)
    }
}

/// Tally of terminal states over a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Files containing every target
    pub satisfied: usize,
    /// Files whose cells were not searched because of their size
    pub skipped:   usize,
    /// Files searched without finding every target
    pub exhausted: usize,
    /// Files that could not be read
    pub failed:    usize,
}

impl RunSummary {
    fn record(&mut self, state: SearchState) {
        debug_assert!(state.is_terminal(), "recorded non-terminal state {state:?}");
        match state {
            SearchState::Satisfied => self.satisfied += 1,
            SearchState::SkippedForSize => self.skipped += 1,
            SearchState::Exhausted => self.exhausted += 1,
            SearchState::Failed => self.failed += 1,
            SearchState::NotStarted | SearchState::SheetNamesChecked | SearchState::CellsPending => {},
        }
    }
}

/// Decides, file by file, how far to search
pub struct SearchPolicy<C, S> {
    config:  SearchConfig,
    confirm: C,
    scanner: S,
}

impl<C, S> fmt::Debug for SearchPolicy<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchPolicy").field("config", &self.config).finish_non_exhaustive()
    }
}

impl<C: Confirm, S: CellScanner> SearchPolicy<C, S> {
    /// Create a policy
    pub const fn new(config: SearchConfig, confirm: C, scanner: S) -> Self {
        Self { config, confirm, scanner }
    }

    /// Configuration driving this policy
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Evaluate every file in order
    pub fn run(&mut self, files: &mut [CandidateFile]) -> RunSummary {
        let mut summary = RunSummary::default();
        for file in files.iter_mut() {
            summary.record(self.evaluate(file));
        }
        info!(
            satisfied = summary.satisfied,
            skipped = summary.skipped,
            exhausted = summary.exhausted,
            failed = summary.failed,
            "search finished"
        );
        summary
    }

    /// Evaluate one file and return its terminal state
    ///
    /// Read errors are logged and leave both result flags unset.
    pub fn evaluate(&mut self, file: &mut CandidateFile) -> SearchState {
        match self.try_evaluate(file) {
            Ok(state) => {
                info!(id = file.id(), path = %file.path().display(), ?state, "file evaluated");
                state
            },
            Err(e) => {
                warn!(id = file.id(), path = %file.path().display(), error = %e, "file skipped");
                SearchState::Failed
            },
        }
    }

    fn try_evaluate(&mut self, file: &mut CandidateFile) -> Result<SearchState> {
        let mut targets = self.config.working_targets();
        debug!(id = file.id(), state = ?SearchState::NotStarted, path = %file.path().display());

        file.set_sheet_names(list_sheet_names(file.path())?);
        let found = match_targets(file.sheet_names(), &mut targets);
        debug!(
            id = file.id(),
            state = ?SearchState::SheetNamesChecked,
            remaining = targets.len(),
            "sheet names matched"
        );

        if found {
            file.mark_found();
            return Ok(SearchState::Satisfied);
        }
        if !self.config.search_cells() {
            return Ok(SearchState::Exhausted);
        }

        debug!(id = file.id(), state = ?SearchState::CellsPending, size_mb = file.size_mb());
        if file.size_mb() > self.config.size_threshold_mb() && !self.confirm.confirm(file) {
            file.mark_skipped_for_size();
            return Ok(SearchState::SkippedForSize);
        }

        if self.scanner.scan_cells(file.path(), file.sheet_names(), &mut targets)? {
            file.mark_found();
            Ok(SearchState::Satisfied)
        } else {
            Ok(SearchState::Exhausted)
        }
    }
}
