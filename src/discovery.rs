//! Spreadsheet discovery under a root directory

use std::collections::VecDeque;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{CandidateFile, MAX_DEPTH, MAX_FILES};

/// File name patterns treated as spreadsheets
pub const SPREADSHEET_PATTERNS: [&str; 3] = ["*.xlsx", "*.xlsm", "*.xls"];

/// Prefix of the lock files spreadsheet applications create next to open files
pub const LOCK_FILE_PREFIX: &str = "~$";

/// Breadth-first directory crawler yielding spreadsheets one directory at a time
#[derive(Debug)]
pub struct Crawler {
    /// Directories still to read, with their depth below the root
    queue:      VecDeque<(PathBuf, usize)>,
    /// Whether subdirectories are queued
    recursive:  bool,
    /// Compiled spreadsheet name patterns
    patterns:   GlobSet,
    /// Number of spreadsheets collected
    file_count: usize,
    /// Number of directories discovered
    dir_count:  usize,
}

impl Crawler {
    /// Create a crawler rooted at `root`
    ///
    /// # Errors
    /// Returns error if:
    /// - `root` is not an existing directory
    /// - The spreadsheet patterns fail to compile
    pub fn new(root: &Path, recursive: bool) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in SPREADSHEET_PATTERNS {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::config(&format!("Invalid pattern: {e}")))?;
            builder.add(glob);
        }
        let patterns =
            builder.build().map_err(|e| Error::config(&format!("Invalid pattern set: {e}")))?;

        let mut queue = VecDeque::new();
        queue.push_back((root.to_path_buf(), 0));

        Ok(Self { queue, recursive, patterns, file_count: 0, dir_count: 1 })
    }

    /// Number of spreadsheets collected and directories discovered so far
    #[must_use = "Progress information should be used for monitoring"]
    pub const fn progress(&self) -> (usize, usize) {
        (self.file_count, self.dir_count)
    }

    /// Whether a file name looks like a spreadsheet and is not a lock file
    #[must_use]
    pub fn is_spreadsheet(&self, name: &OsStr) -> bool {
        let lossy = name.to_string_lossy();
        !lossy.starts_with(LOCK_FILE_PREFIX) && self.patterns.is_match(name)
    }

    /// Read the next directory in the queue
    ///
    /// Returns its spreadsheets, sorted by name, with their sizes in bytes.
    /// Below the root, unreadable directories and entries are logged and
    /// skipped.
    ///
    /// # Errors
    /// Returns error if:
    /// - The root directory or one of its entries cannot be read
    /// - Directory depth exceeds `MAX_DEPTH`
    /// - Spreadsheet count exceeds `MAX_FILES`
    pub fn process_next(&mut self) -> Result<Option<Vec<(PathBuf, u64)>>> {
        let Some((dir, depth)) = self.queue.pop_front() else {
            return Ok(None);
        };

        let Some(read_dir) = tolerate(fs::read_dir(&dir), &dir, depth)? else {
            return Ok(Some(Vec::new()));
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            entries.extend(tolerate(entry, &dir, depth)?);
        }
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.path();
            let Some(file_type) = tolerate(entry.file_type(), &path, depth)? else {
                continue;
            };

            if file_type.is_dir() {
                if !self.recursive {
                    continue;
                }
                let new_depth = depth + 1;
                if new_depth >= MAX_DEPTH {
                    return Err(Error::DepthExceeded);
                }
                self.queue.push_back((path, new_depth));
                self.dir_count += 1;
            } else if self.is_spreadsheet(&entry.file_name()) {
                let size = match fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => meta.len(),
                    Ok(_) => continue,
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                        continue;
                    },
                };
                if self.file_count >= MAX_FILES {
                    return Err(Error::FileCountExceeded);
                }
                files.push((path, size));
                self.file_count += 1;
            }
        }

        Ok(Some(files))
    }
}

/// Pass `result` through, except that below the root an error is logged
/// and turned into `None`
fn tolerate<T>(result: io::Result<T>, path: &Path, depth: usize) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if depth > 0 => {
            warn!(path = %path.display(), error = %e, "skipping unreadable entry");
            Ok(None)
        },
        Err(e) => Err(e.into()),
    }
}

/// Collect the spreadsheets under `root`, assigning ids in discovery order
///
/// The root's own files come first; with `recursive`, subdirectories follow
/// breadth-first in name order.
///
/// # Errors
/// Same as [`Crawler::new`] and [`Crawler::process_next`], plus `Error::Io`
/// if `root` cannot be made absolute.
pub fn discover(root: &Path, recursive: bool) -> Result<Vec<CandidateFile>> {
    let root = std::path::absolute(root)?;
    let mut crawler = Crawler::new(&root, recursive)?;
    let mut candidates = Vec::new();

    while let Some(batch) = crawler.process_next()? {
        for (path, bytes) in batch {
            candidates.push(CandidateFile::from_bytes(candidates.len(), path, bytes));
        }
    }

    let (files, dirs) = crawler.progress();
    debug!(root = %root.display(), files, dirs, "discovery finished");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn touch(path: &Path, bytes: usize) {
        let mut file = File::create(path).unwrap();
        file.write_all(&vec![0u8; bytes]).unwrap();
    }

    fn tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("b.xlsx"), 10);
        touch(&root.join("a.xls"), 10);
        touch(&root.join("c.xlsm"), 10);
        touch(&root.join("~$b.xlsx"), 10);
        touch(&root.join("notes.txt"), 10);
        touch(&root.join("REPORT.XLSX"), 10);
        fs::create_dir(root.join("sub")).unwrap();
        touch(&root.join("sub").join("d.xlsx"), 250_000);
        fs::create_dir(root.join("sub").join("deeper")).unwrap();
        touch(&root.join("sub").join("deeper").join("e.xlsx"), 10);
        temp_dir
    }

    fn names(files: &[CandidateFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_top_level_only() {
        let temp_dir = tree();
        let files = discover(temp_dir.path(), false).unwrap();

        assert_eq!(names(&files), ["REPORT.XLSX", "a.xls", "b.xlsx", "c.xlsm"]);
        assert_eq!(files.iter().map(CandidateFile::id).collect::<Vec<_>>(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_recursive_breadth_first() {
        let temp_dir = tree();
        let files = discover(temp_dir.path(), true).unwrap();

        assert_eq!(names(&files), [
            "REPORT.XLSX",
            "a.xls",
            "b.xlsx",
            "c.xlsm",
            "d.xlsx",
            "e.xlsx"
        ]);
        assert_eq!(files[5].id(), 5);
    }

    #[test]
    fn test_paths_are_absolute_with_sizes() {
        let temp_dir = tree();
        let files = discover(temp_dir.path(), true).unwrap();

        assert!(files.iter().all(|f| f.path().is_absolute()));
        let sub = files.iter().find(|f| f.path().ends_with("sub/d.xlsx")).unwrap();
        assert!((sub.size_mb() - 0.3).abs() < f64::EPSILON);
        assert!(sub.sheet_names().is_empty());
        assert!(!sub.values_found() && !sub.skipped_for_size());
    }

    #[test]
    fn test_lock_files_and_other_extensions_ignored() {
        let temp_dir = tree();
        let crawler = Crawler::new(temp_dir.path(), false).unwrap();

        assert!(crawler.is_spreadsheet(OsStr::new("book.xlsx")));
        assert!(!crawler.is_spreadsheet(OsStr::new("~$book.xlsx")));
        assert!(!crawler.is_spreadsheet(OsStr::new("book.csv")));
        assert!(!crawler.is_spreadsheet(OsStr::new("book.xlsx.bak")));
    }

    #[test]
    fn test_progress_reporting() {
        let temp_dir = tree();
        let mut crawler = Crawler::new(temp_dir.path(), true).unwrap();
        assert_eq!(crawler.progress(), (0, 1));

        while crawler.process_next().unwrap().is_some() {}

        assert_eq!(crawler.progress(), (6, 3));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(discover(temp_dir.path(), true).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        assert!(matches!(discover(&missing, false), Err(Error::NotADirectory(_))));
    }

    #[test]
    fn test_entry_errors_below_root_are_skipped() {
        let missing = Path::new("gone");
        let err = || io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        assert_eq!(tolerate(Ok::<_, io::Error>(7), missing, 0).unwrap(), Some(7));
        assert_eq!(tolerate::<u8>(Err(err()), missing, 1).unwrap(), None);
        assert!(matches!(tolerate::<u8>(Err(err()), missing, 0), Err(Error::Io(_))));
    }

    #[test]
    fn test_vanished_subdirectory_is_skipped() {
        let temp_dir = tree();
        let mut crawler = Crawler::new(temp_dir.path(), true).unwrap();

        let top = crawler.process_next().unwrap().unwrap();
        assert_eq!(top.len(), 4);
        fs::remove_dir_all(temp_dir.path().join("sub")).unwrap();

        assert_eq!(crawler.process_next().unwrap(), Some(Vec::new()));
        assert_eq!(crawler.process_next().unwrap(), None);
    }
}
