//! Rendering of search results

use std::io::{self, Write};

use crate::types::CandidateFile;

/// Search results split into matched and size-skipped files
#[derive(Debug)]
pub struct Report<'a> {
    targets: &'a [String],
    found:   Vec<&'a CandidateFile>,
    skipped: Vec<&'a CandidateFile>,
}

impl<'a> Report<'a> {
    /// Partition evaluated files
    #[must_use]
    pub fn new(targets: &'a [String], files: &'a [CandidateFile]) -> Self {
        let found = files.iter().filter(|f| f.values_found()).collect();
        let skipped = files.iter().filter(|f| !f.values_found() && f.skipped_for_size()).collect();
        Self { targets, found, skipped }
    }

    /// Files containing every target
    #[must_use]
    pub fn found(&self) -> &[&'a CandidateFile] {
        &self.found
    }

    /// Files whose cells were not searched because of their size
    #[must_use]
    pub fn skipped(&self) -> &[&'a CandidateFile] {
        &self.skipped
    }

    /// Whether there is nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.found.is_empty() && self.skipped.is_empty()
    }

    /// Write the report
    ///
    /// # Errors
    /// Returns any error from `out`.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n\nResult of the search:\n")?;
        if self.is_empty() {
            writeln!(out, "No files found...")?;
        }
        if !self.found.is_empty() {
            writeln!(out, "The below files contain: {}", self.targets.join(","))?;
            render_files(out, &self.found)?;
        }
        if !self.skipped.is_empty() {
            writeln!(
                out,
                "The cells of the below files have not been searched due to file size limitation:"
            )?;
            render_files(out, &self.skipped)?;
        }
        Ok(())
    }
}

fn render_files<W: Write>(out: &mut W, files: &[&CandidateFile]) -> io::Result<()> {
    for file in files {
        writeln!(out, "\t-id: {}; file: {}\n", file.id(), file.path().display())?;
    }
    Ok(())
}
