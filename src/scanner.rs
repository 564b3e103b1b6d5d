//! Cell-level search over a workbook's sheets

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::error::{Error, Result};
use crate::matcher::{TargetSet, match_targets};

/// Reads cell values and feeds them to the matcher
pub trait CellScanner {
    /// Match `targets` against the cells of each sheet in `sheet_names`
    ///
    /// Returns `true` as soon as the set is empty; remaining sheets are not
    /// read.
    ///
    /// # Errors
    /// Returns `Error::Read` if the workbook or one of its sheets cannot be
    /// materialized.
    fn scan_cells(
        &mut self,
        path: &Path,
        sheet_names: &[String],
        targets: &mut TargetSet,
    ) -> Result<bool>;
}

/// Scanner backed by `calamine`
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkbookScanner;

impl WorkbookScanner {
    /// Create a new scanner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CellScanner for WorkbookScanner {
    fn scan_cells(
        &mut self,
        path: &Path,
        sheet_names: &[String],
        targets: &mut TargetSet,
    ) -> Result<bool> {
        let mut workbook = open_workbook_auto(path).map_err(|e| Error::Read {
            path:    path.to_path_buf(),
            sheet:   None,
            message: e.to_string(),
        })?;

        for sheet in sheet_names {
            let range = workbook.worksheet_range(sheet).map_err(|e| Error::Read {
                path:    path.to_path_buf(),
                sheet:   Some(sheet.clone()),
                message: e.to_string(),
            })?;

            let (height, width) = range.get_size();
            debug!(path = %path.display(), sheet = %sheet, height, width, "scanning cells");

            let cells = range.used_cells().filter_map(|(_, _, value)| cell_text(value));
            if match_targets(cells, targets) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Text a cell is matched by, `None` for empty cells
///
/// Dates render as `2024-01-15 00:00:00` rather than their serial number and
/// booleans as `True`/`False`.
fn cell_text(value: &Data) -> Option<String> {
    match value {
        Data::Empty => None,
        Data::DateTime(dt) if !dt.is_duration() => Some(
            dt.as_datetime()
                .map_or_else(|| dt.to_string(), |d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::Bool(true) => Some("True".to_owned()),
        Data::Bool(false) => Some("False".to_owned()),
        other => Some(other.to_string()),
    }
}
