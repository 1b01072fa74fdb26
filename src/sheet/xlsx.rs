use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use super::{Cell, Sheet, Workbook, COL_NAME};
use crate::ledger::ImportIssue;

/// Write `workbook` as an .xlsx file. Amounts are stored as numbers with a
/// two-decimal format; everything else as text.
pub fn write_workbook(workbook: &Workbook, path: &Path) -> Result<()> {
    let mut book = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("#,##0.00");

    for sheet in &workbook.sheets {
        let ws = book.add_worksheet();
        ws.set_name(&sheet.name)
            .with_context(|| format!("Invalid sheet name '{}'", sheet.name))?;

        for (r, row) in sheet.rows.iter().enumerate() {
            let r = u32::try_from(r).context("Too many rows for a worksheet")?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c).context("Too many columns for a worksheet")?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) if r == 0 => {
                        ws.write_string_with_format(r, c, text, &header_format)?;
                    }
                    Cell::Text(text) => {
                        ws.write_string(r, c, text)?;
                    }
                    Cell::Number(n) => {
                        let value = n
                            .to_f64()
                            .with_context(|| format!("Amount {n} does not fit a spreadsheet cell"))?;
                        ws.write_number_with_format(r, c, value, &amount_format)?;
                    }
                }
            }
        }

        if let Some(name_col) = sheet.header().iter().position(|h| h.to_string() == COL_NAME) {
            let name_col = u16::try_from(name_col).unwrap_or(1);
            ws.set_column_width(name_col, 32)?;
        }
    }

    book.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read every sheet of an .xlsx/.xls file. Sheets the reader cannot decode are
/// returned as issues alongside the ones it could.
pub fn read_workbook(path: &Path) -> Result<(Workbook, Vec<ImportIssue>)> {
    let mut book = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet {}", path.display()))?;
    let names = book.sheet_names().to_owned();

    let mut workbook = Workbook::default();
    let mut issues = Vec::new();
    for name in names {
        match book.worksheet_range(&name) {
            Ok(range) => {
                let rows = range
                    .rows()
                    .map(|row| row.iter().map(convert_cell).collect())
                    .collect();
                workbook.sheets.push(Sheet { name, rows });
            }
            Err(e) => issues.push(ImportIssue::Unreadable {
                sheet: name,
                reason: e.to_string(),
            }),
        }
    }

    Ok((workbook, issues))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.trim()),
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(|d| Cell::Number(d.normalize()))
            .unwrap_or_else(|| Cell::text(f.to_string())),
        other => Cell::text(other.to_string()),
    }
}
