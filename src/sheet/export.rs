use std::collections::HashSet;

use super::{
    sheet_name_for, Cell, Sheet, Workbook, HEADERS, REMAINING_LABEL, SHEET_NAME_LIMIT,
    SUMMARY_MARKER, TOTAL_LABEL, USED_LABEL,
};
use crate::ledger::{format_percentage, Ledger};
use crate::models::BudgetRecord;

impl Ledger {
    /// Lay out every region as its own sheet: items, a blank separator row,
    /// then the summary block.
    pub fn export_all(&self) -> Workbook {
        let mut used_names = HashSet::new();
        let sheets = self
            .iter()
            .map(|(region, record)| {
                let name = unique_sheet_name(region, &mut used_names);
                region_sheet(name, record)
            })
            .collect();
        Workbook { sheets }
    }
}

fn region_sheet(name: String, record: &BudgetRecord) -> Sheet {
    let mut sheet = Sheet::new(name);
    sheet.push_row(HEADERS.iter().map(|h| Cell::text(*h)).collect());

    for (item, pct) in record.items_with_percentages() {
        sheet.push_row(vec![
            Cell::text(item.number.as_str()),
            Cell::text(item.name.as_str()),
            Cell::Number(item.amount),
            Cell::text(format_percentage(pct)),
        ]);
    }

    let summary = record.summary();
    sheet.push_row(vec![Cell::Empty; HEADERS.len()]);
    sheet.push_row(vec![
        Cell::text(SUMMARY_MARKER),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
    ]);
    sheet.push_row(vec![
        Cell::text(TOTAL_LABEL),
        Cell::Empty,
        Cell::Number(summary.total_budget),
        Cell::text("100%"),
    ]);
    sheet.push_row(vec![
        Cell::text(USED_LABEL),
        Cell::Empty,
        Cell::Number(summary.used_amount),
        Cell::text(format_percentage(summary.used_percentage)),
    ]);
    sheet.push_row(vec![
        Cell::text(REMAINING_LABEL),
        Cell::Empty,
        Cell::Number(summary.remaining_amount),
        Cell::text(format_percentage(summary.remaining_percentage())),
    ]);
    sheet
}

/// Two long region names can share their first 30 characters; later ones get
/// a `~N` suffix so every sheet name stays distinct and within the limit.
fn unique_sheet_name(region: &str, used: &mut HashSet<String>) -> String {
    let base = sheet_name_for(region);
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let suffix = format!("~{n}");
        let keep = SHEET_NAME_LIMIT - suffix.chars().count();
        let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
