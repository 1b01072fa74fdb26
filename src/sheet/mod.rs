//! A small in-memory spreadsheet model shared by the xlsx and csv codecs,
//! plus the ledger's export/import against it.

pub mod csv_io;
mod export;
mod import;
pub mod xlsx;

use std::fmt;

use rust_decimal::Decimal;

pub const COL_NUMBER: &str = "Item Number";
pub const COL_NAME: &str = "Item Name";
pub const COL_AMOUNT: &str = "Amount";
pub const COL_PERCENTAGE: &str = "Percentage";
pub const HEADERS: [&str; 4] = [COL_NUMBER, COL_NAME, COL_AMOUNT, COL_PERCENTAGE];

/// Marks the end of the item rows; everything after it is the summary block.
pub const SUMMARY_MARKER: &str = "SUMMARY";
pub const TOTAL_LABEL: &str = "Total Budget";
pub const USED_LABEL: &str = "Used Amount";
pub const REMAINING_LABEL: &str = "Remaining Budget";

/// xlsx sheet names are capped at 31 characters; exports keep one spare.
pub const SHEET_NAME_LIMIT: usize = 30;

/// Ceiling reconstructed on import: items' sum plus 10%.
pub const CONTINGENCY_MARGIN: Decimal = Decimal::from_parts(11, 0, 0, false, 1);

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(Decimal),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{}", n.normalize()),
        }
    }
}

/// One table. Row 0 is the header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Sheet name for a region: characters xlsx forbids become `_`, and the
/// result is cut to [`SHEET_NAME_LIMIT`] characters (not bytes).
pub fn sheet_name_for(region: &str) -> String {
    region
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(SHEET_NAME_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests;
