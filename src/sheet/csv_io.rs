//! CSV rendition of a workbook: one region per file, file stem = region.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use super::{Cell, Sheet, Workbook, COL_AMOUNT};
use crate::ledger::ImportIssue;

pub fn write_sheet(sheet: &Sheet, path: &Path) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in &sheet.rows {
        wtr.write_record(row.iter().map(Cell::to_string))
            .context("Failed to write CSV record")?;
    }
    wtr.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Write every sheet to `<dir>/<sheet name>.csv`, creating `dir` if needed.
/// Returns the files written.
pub fn write_workbook_dir(workbook: &Workbook, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let mut written = Vec::with_capacity(workbook.sheets.len());
    for sheet in &workbook.sheets {
        let path = dir.join(format!("{}.csv", sheet.name));
        write_sheet(sheet, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Read one CSV file as a sheet named after the file stem.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .unwrap_or_default();

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    // CSV has no cell types; amounts come back as numbers so a re-export
    // formats them like the xlsx path does.
    let amount_col = rows
        .first()
        .and_then(|h| h.iter().position(|c| c == COL_AMOUNT));
    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(r, row)| {
            row.into_iter()
                .enumerate()
                .map(|(c, value)| match Decimal::from_str(&value) {
                    Ok(n) if r > 0 && Some(c) == amount_col => Cell::Number(n),
                    _ => Cell::text(value),
                })
                .collect()
        })
        .collect();

    Ok(Sheet { name, rows })
}

/// Read every `*.csv` in `dir` (sorted by name). Files that fail to parse are
/// reported as issues.
pub fn read_workbook_dir(dir: &Path) -> Result<(Workbook, Vec<ImportIssue>)> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_csv(p))
        .collect();
    paths.sort();

    let mut workbook = Workbook::default();
    let mut issues = Vec::new();
    for path in paths {
        match read_sheet(&path) {
            Ok(sheet) => workbook.sheets.push(sheet),
            Err(e) => issues.push(ImportIssue::Unreadable {
                sheet: path.display().to_string(),
                reason: format!("{e:#}"),
            }),
        }
    }
    Ok((workbook, issues))
}

pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}
