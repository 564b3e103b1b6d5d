//! Selection of a reported file to open

use crate::types::CandidateFile;

/// Find the candidate whose id is exactly `input`
///
/// Any text that is not an id of `files` selects nothing.
#[must_use]
pub fn select<'a>(files: &'a [CandidateFile], input: &str) -> Option<&'a CandidateFile> {
    let id = input.parse::<usize>().ok().filter(|id| id.to_string() == input)?;
    files.iter().find(|file| file.id() == id)
}
