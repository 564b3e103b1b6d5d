//! Workbook fixtures for tests

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Workbook manifest listing `names`
pub fn manifest_xml(names: &[&str]) -> String {
    let sheets: String = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!(r#"<sheet name="{name}" sheetId="{}" r:id="rId{}"/>"#, i + 1, i + 1))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets}</sheets></workbook>"#
    )
}

/// Zip container holding `entries`
pub fn write_zip(dir: &TempDir, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let entries: Vec<(&str, Vec<u8>)> =
        entries.iter().map(|(entry, content)| (*entry, content.as_bytes().to_vec())).collect();
    write_zip_bytes(dir, name, &entries)
}

/// Zip container holding raw `entries`
pub fn write_zip_bytes(dir: &TempDir, name: &str, entries: &[(&str, Vec<u8>)]) -> PathBuf {
    let path = dir.path().join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    for (entry, content) in entries {
        zip.start_file(*entry, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
    path
}

/// Container with only a manifest at the default location
pub fn write_manifest_only(dir: &TempDir, name: &str, manifest: &str) -> PathBuf {
    write_zip(dir, name, &[("xl/workbook.xml", manifest)])
}

/// Real workbook with one entry per sheet; cells that parse as numbers are
/// written as numbers
pub fn write_workbook(dir: &TempDir, name: &str, sheets: &[(&str, Vec<Vec<&str>>)]) -> PathBuf {
    let path = dir.path().join(name);
    let mut workbook = Workbook::new();
    for (sheet_name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name).unwrap();
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let row = u32::try_from(row).unwrap();
                let col = u16::try_from(col).unwrap();
                match cell.parse::<f64>() {
                    Ok(number) => worksheet.write_number(row, col, number).unwrap(),
                    Err(_) => worksheet.write_string(row, col, *cell).unwrap(),
                };
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}
