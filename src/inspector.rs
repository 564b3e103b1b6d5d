//! Sheet name extraction from a workbook's manifest
//!
//! Opening a large workbook through a full reader just to learn its sheet
//! names is slow. The manifest part is small whatever the workbook size, so
//! it is streamed straight out of the zip container and nothing else is
//! decompressed.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};

/// Manifest location used when the package relationships do not name one
pub const DEFAULT_MANIFEST: &str = "xl/workbook.xml";

/// Package relationships part
const PACKAGE_RELS: &str = "_rels/.rels";

/// Relationship type suffix of the main workbook part
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// Largest manifest or relationships part read from a container
pub const MAX_MANIFEST_BYTES: u64 = 8 * 1024 * 1024;

/// List the sheet names of the workbook at `path`, in document order
///
/// # Errors
/// - `Error::Io` if the file cannot be opened
/// - `Error::Container` if the file is not a zip container
/// - `Error::Manifest` if the manifest is missing, oversized, not well-formed,
///   or has no sheet list
pub fn list_sheet_names(path: &Path) -> Result<Vec<String>> {
    read_sheet_names(path, MAX_MANIFEST_BYTES)
}

fn read_sheet_names(path: &Path, limit: u64) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|source| Error::Container { path: path.to_path_buf(), source })?;

    let manifest_path = locate_manifest(&mut archive, limit);
    debug!(path = %path.display(), manifest = %manifest_path, "reading workbook manifest");

    let xml = read_entry(&mut archive, &manifest_path, limit).map_err(|e| match e {
        ZipError::FileNotFound => {
            Error::manifest(path, format!("{manifest_path} not found in container"))
        },
        ZipError::Io(io) => Error::Io(io),
        other => Error::Container { path: path.to_path_buf(), source: other },
    })?;
    if xml.len() as u64 > limit {
        return Err(Error::manifest(path, format!("{manifest_path} exceeds {limit} bytes")));
    }

    parse_sheet_names(&xml).map_err(|reason| Error::manifest(path, reason))
}

/// Resolve the workbook part through `_rels/.rels`, defaulting to `xl/workbook.xml`
fn locate_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>, limit: u64) -> String {
    read_entry(archive, PACKAGE_RELS, limit)
        .ok()
        .filter(|rels| rels.len() as u64 <= limit)
        .and_then(|rels| office_document_target(&rels))
        .unwrap_or_else(|| DEFAULT_MANIFEST.to_owned())
}

/// Raw bytes of an entry, at most `limit + 1` of them
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    limit: u64,
) -> std::result::Result<Vec<u8>, ZipError> {
    let entry = archive.by_name(name)?;
    let mut content = Vec::new();
    entry.take(limit + 1).read_to_end(&mut content)?;
    Ok(content)
}

fn office_document_target(rels_xml: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e) | Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let is_workbook =
                    attribute(e, b"Type").is_some_and(|ty| ty.ends_with(OFFICE_DOCUMENT_REL));
                if is_workbook {
                    let target = attribute(e, b"Target")?;
                    return Some(target.trim_start_matches('/').to_owned());
                }
            },
            Ok(Event::Eof) | Err(_) => return None,
            _ => {},
        }
    }
}

/// Extract `sheet/@name` values from a workbook manifest
///
/// Element and attribute names are compared by local name, so producers
/// that prefix them (`x:sheet`, `x:name`) are read the same way.
fn parse_sheet_names(xml: &[u8]) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut names = Vec::new();
    let mut saw_sheet_list = false;
    let mut in_sheet_list = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"sheets" => {
                saw_sheet_list = true;
                in_sheet_list = true;
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"sheets" => {
                saw_sheet_list = true;
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"sheets" => {
                in_sheet_list = false;
            },
            Ok(Event::Empty(ref e) | Event::Start(ref e))
                if in_sheet_list && e.local_name().as_ref() == b"sheet" =>
            {
                let name = attribute(e, b"name")
                    .ok_or_else(|| format!("sheet #{} has no name", names.len() + 1))?;
                names.push(name);
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at position {}: {e}",
                    reader.error_position()
                ));
            },
            _ => {},
        }
    }

    if !saw_sheet_list {
        return Err("missing sheet list".to_owned());
    }
    if names.is_empty() {
        return Err("sheet list is empty".to_owned());
    }
    Ok(names)
}

/// Unescaped value of the attribute whose local name is `local`
fn attribute(element: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    element.attributes().flatten().find(|attr| attr.key.local_name().as_ref() == local).map(
        |attr| {
            let raw = String::from_utf8_lossy(&attr.value);
            unescape(&raw).map_or_else(|_| raw.to_string(), |value| value.into_owned())
        },
    )
}
