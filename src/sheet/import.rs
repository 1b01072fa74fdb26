use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::{
    Cell, Sheet, Workbook, COL_AMOUNT, COL_NAME, COL_NUMBER, CONTINGENCY_MARGIN, SUMMARY_MARKER,
};
use crate::ledger::{ImportIssue, ImportReport, Ledger, LedgerError};
use crate::models::{sum_amounts, BudgetRecord, LineItem};

struct Columns {
    number: usize,
    name: usize,
    amount: usize,
}

impl Ledger {
    /// Load every usable sheet as a region, replacing any record of the same
    /// name. The exported ceiling is not read back: each imported region gets
    /// `sum(amount) * 1.1` as its new ceiling.
    ///
    /// A bad sheet is skipped and reported; it never stops the others.
    pub fn import_all(&mut self, workbook: &Workbook) -> ImportReport {
        let mut report = ImportReport::default();

        for sheet in &workbook.sheets {
            let mut skipped = Vec::new();
            match parse_sheet(sheet, &mut skipped).and_then(|parsed| with_ceiling(sheet, parsed)) {
                Ok((region, items, ceiling)) => {
                    info!(sheet = %sheet.name, items = items.len(), %ceiling, "sheet imported");
                    self.put_record(
                        region.clone(),
                        BudgetRecord::with_items(ceiling, items, chrono::Utc::now()),
                    );
                    report.imported.push(region);
                    for issue in &skipped {
                        warn!(sheet = %sheet.name, "{issue}");
                    }
                    report.issues.append(&mut skipped);
                }
                Err(issue) => {
                    warn!(sheet = %sheet.name, "{issue}");
                    report.issues.push(issue);
                }
            }
        }

        report
    }
}

/// `sum(amount) * 1.1`, failing the sheet if that does not fit in a `Decimal`.
fn with_ceiling(
    sheet: &Sheet,
    (region, items): (String, Vec<LineItem>),
) -> Result<(String, Vec<LineItem>, Decimal), ImportIssue> {
    let ceiling = sum_amounts(&items)
        .and_then(|used| used.checked_mul(CONTINGENCY_MARGIN))
        .ok_or_else(|| parse_failed(sheet, "amounts overflow"))?;
    Ok((region, items, ceiling))
}

/// Items of one sheet. Rows with a number but no name land in `skipped`.
fn parse_sheet(
    sheet: &Sheet,
    skipped: &mut Vec<ImportIssue>,
) -> Result<(String, Vec<LineItem>), ImportIssue> {
    let columns = locate_columns(sheet)?;
    let region = sheet.name.trim().to_string();
    if region.is_empty() {
        return Err(parse_failed(sheet, "sheet has no name"));
    }

    let mut items = Vec::new();
    for (i, row) in sheet.rows.iter().enumerate().skip(1) {
        if row.iter().all(Cell::is_blank) {
            continue;
        }

        let number = cell_text(row, columns.number);
        let name = cell_text(row, columns.name);
        if number == SUMMARY_MARKER || name == SUMMARY_MARKER {
            break;
        }
        if number.is_empty() {
            continue;
        }
        if name.is_empty() {
            skipped.push(ImportIssue::RowSkipped {
                sheet: sheet.name.clone(),
                row: i + 1,
                reason: format!("item {number} has no name"),
            });
            continue;
        }

        let amount = parse_amount(row.get(columns.amount))
            .map_err(|reason| parse_failed(sheet, &format!("row {}: {reason}", i + 1)))?;
        items.push(LineItem::new(number, name, amount));
    }

    Ok((region, items))
}

fn locate_columns(sheet: &Sheet) -> Result<Columns, ImportIssue> {
    let header = sheet.header();
    let find = |label: &str| {
        header
            .iter()
            .position(|c| matches!(c, Cell::Text(t) if t.trim() == label))
    };

    match (find(COL_NUMBER), find(COL_NAME), find(COL_AMOUNT)) {
        (Some(number), Some(name), Some(amount)) => Ok(Columns {
            number,
            name,
            amount,
        }),
        (number, name, amount) => {
            let missing = [
                (number, COL_NUMBER),
                (name, COL_NAME),
                (amount, COL_AMOUNT),
            ]
            .into_iter()
            .filter(|(found, _)| found.is_none())
            .map(|(_, label)| label)
            .collect();
            Err(ImportIssue::MissingColumns {
                sheet: sheet.name.clone(),
                missing,
            })
        }
    }
}

fn cell_text(row: &[Cell], index: usize) -> String {
    row.get(index)
        .map(|c| c.to_string().trim().to_string())
        .unwrap_or_default()
}

fn parse_amount(cell: Option<&Cell>) -> Result<Decimal, String> {
    let amount = match cell {
        Some(Cell::Number(n)) => *n,
        Some(Cell::Text(s)) => {
            let cleaned = s.replace([',', ' ', '\u{a0}'], "");
            Decimal::from_str(&cleaned).map_err(|_| format!("'{s}' is not an amount"))?
        }
        Some(Cell::Empty) | None => return Err("amount is missing".into()),
    };
    if amount < Decimal::ZERO {
        return Err(format!("amount {amount} is negative"));
    }
    Ok(amount)
}

fn parse_failed(sheet: &Sheet, reason: &str) -> ImportIssue {
    ImportIssue::Failed(LedgerError::ImportParseFailed {
        sheet: sheet.name.clone(),
        reason: reason.to_string(),
    })
}
