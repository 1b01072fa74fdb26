#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::ledger::{ImportIssue, Ledger, LedgerError};

fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger.set_total_budget("Bakı", dec!(600)).unwrap();
    ledger.add_item("Bakı", "01", "Roads", dec!(500)).unwrap();
    ledger.set_total_budget("Quba", dec!(1000)).unwrap();
    ledger.add_item("Quba", "01", "Schools", dec!(250)).unwrap();
    ledger.add_item("Quba", "02", "Clinics", dec!(120.5)).unwrap();
    ledger
}

fn text_row(cells: &[&str]) -> Vec<Cell> {
    cells.iter().map(|c| Cell::text(*c)).collect()
}

fn header_row() -> Vec<Cell> {
    text_row(&HEADERS)
}

// ── Cell / sheet names ────────────────────────────────────────

#[test]
fn test_cell_text_empty_is_empty() {
    assert_eq!(Cell::text(""), Cell::Empty);
    assert!(Cell::text("  ").is_blank());
    assert!(!Cell::Number(dec!(0)).is_blank());
}

#[test]
fn test_cell_number_display_normalized() {
    assert_eq!(Cell::Number(dec!(500.00)).to_string(), "500");
    assert_eq!(Cell::Number(dec!(120.50)).to_string(), "120.5");
}

#[test]
fn test_sheet_name_truncated_by_chars() {
    let region = "Şəki-Zaqatala iqtisadi rayonunun mərkəzi";
    let name = sheet_name_for(region);
    assert_eq!(name.chars().count(), SHEET_NAME_LIMIT);
    assert!(region.starts_with(&name));
}

#[test]
fn test_sheet_name_replaces_forbidden_chars() {
    assert_eq!(sheet_name_for("A/B:C[1]"), "A_B_C_1_");
}

// ── export_all ────────────────────────────────────────────────

#[test]
fn test_export_one_sheet_per_region_in_name_order() {
    let book = sample_ledger().export_all();
    assert_eq!(book.sheet_names(), vec!["Bakı", "Quba"]);
}

#[test]
fn test_export_layout() {
    let book = sample_ledger().export_all();
    let sheet = book.sheet("Bakı").unwrap();

    assert_eq!(sheet.header(), header_row().as_slice());
    assert_eq!(
        sheet.rows[1],
        vec![
            Cell::text("01"),
            Cell::text("Roads"),
            Cell::Number(dec!(500)),
            Cell::text("83.33%"),
        ]
    );
    assert!(sheet.rows[2].iter().all(Cell::is_blank));
    assert_eq!(sheet.rows[3][0], Cell::text(SUMMARY_MARKER));
    assert_eq!(sheet.rows[4][0], Cell::text(TOTAL_LABEL));
    assert_eq!(sheet.rows[4][2], Cell::Number(dec!(600)));
    assert_eq!(sheet.rows[4][3], Cell::text("100%"));
    assert_eq!(sheet.rows[5][0], Cell::text(USED_LABEL));
    assert_eq!(sheet.rows[5][2], Cell::Number(dec!(500)));
    assert_eq!(sheet.rows[5][3], Cell::text("83.33%"));
    assert_eq!(sheet.rows[6][0], Cell::text(REMAINING_LABEL));
    assert_eq!(sheet.rows[6][2], Cell::Number(dec!(100)));
    assert_eq!(sheet.rows[6][3], Cell::text("16.67%"));
    assert_eq!(sheet.rows.len(), 7);
}

#[test]
fn test_export_region_without_items() {
    let mut ledger = Ledger::new();
    ledger.set_total_budget("Laçın", dec!(0)).unwrap();
    let book = ledger.export_all();
    let sheet = book.sheet("Laçın").unwrap();
    // header, blank, marker, three summary rows
    assert_eq!(sheet.rows.len(), 6);
    assert_eq!(sheet.rows[4][3], Cell::text("0%"));
}

#[test]
fn test_export_empty_ledger_has_no_sheets() {
    assert!(Ledger::new().export_all().sheets.is_empty());
}

#[test]
fn test_export_dedups_truncated_names() {
    let mut ledger = Ledger::new();
    let a = "Abşeron-Xızı iqtisadi rayonunun şimal hissəsi";
    let b = "Abşeron-Xızı iqtisadi rayonunun cənub hissəsi";
    ledger.set_total_budget(a, dec!(10)).unwrap();
    ledger.set_total_budget(b, dec!(10)).unwrap();

    let names: Vec<String> = ledger
        .export_all()
        .sheets
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
    assert!(names[1].ends_with("~2"));
    assert!(names
        .iter()
        .all(|n| n.chars().count() <= SHEET_NAME_LIMIT));
}

// ── import_all ────────────────────────────────────────────────

#[test]
fn test_import_rebuilds_ceiling_with_margin() {
    let book = sample_ledger().export_all();
    let mut ledger = Ledger::new();
    let report = ledger.import_all(&book);

    assert_eq!(report.imported, vec!["Bakı", "Quba"]);
    assert!(!report.has_issues());

    let baki = ledger.record("Bakı").unwrap();
    assert_eq!(baki.total_budget(), dec!(550));
    assert_eq!(baki.items().len(), 1);
    assert_eq!(baki.items()[0].name, "Roads");

    let quba = ledger.record("Quba").unwrap();
    assert_eq!(quba.total_budget(), dec!(407.55));
    assert_eq!(quba.items()[1].amount, dec!(120.5));
}

#[test]
fn test_import_skips_sheet_missing_columns() {
    let mut bad = Sheet::new("Gəncə");
    bad.push_row(text_row(&[COL_NUMBER, COL_NAME, COL_PERCENTAGE]));
    bad.push_row(text_row(&["01", "Parks", "10%"]));

    let mut good = Sheet::new("Şəki");
    good.push_row(header_row());
    good.push_row(vec![
        Cell::text("01"),
        Cell::text("Bridges"),
        Cell::Number(dec!(200)),
        Cell::Empty,
    ]);

    let mut ledger = Ledger::new();
    let report = ledger.import_all(&Workbook {
        sheets: vec![bad, good],
    });

    assert_eq!(report.imported, vec!["Şəki"]);
    assert_eq!(
        report.issues,
        vec![ImportIssue::MissingColumns {
            sheet: "Gəncə".into(),
            missing: vec![COL_AMOUNT],
        }]
    );
    assert!(!ledger.contains("Gəncə"));
    assert_eq!(ledger.record("Şəki").unwrap().total_budget(), dec!(220));
}

#[test]
fn test_import_stops_at_summary_marker() {
    let mut sheet = Sheet::new("Lənkəran");
    sheet.push_row(header_row());
    sheet.push_row(vec![
        Cell::text("01"),
        Cell::text("Port"),
        Cell::Number(dec!(100)),
        Cell::Empty,
    ]);
    sheet.push_row(text_row(&[SUMMARY_MARKER]));
    sheet.push_row(vec![
        Cell::text(TOTAL_LABEL),
        Cell::Empty,
        Cell::Number(dec!(999)),
        Cell::text("100%"),
    ]);

    let mut ledger = Ledger::new();
    ledger.import_all(&Workbook {
        sheets: vec![sheet],
    });
    let record = ledger.record("Lənkəran").unwrap();
    assert_eq!(record.items().len(), 1);
    assert_eq!(record.used_amount(), dec!(100));
}

#[test]
fn test_import_skips_rows_without_number() {
    let mut sheet = Sheet::new("Şuşa");
    sheet.push_row(header_row());
    sheet.push_row(vec![
        Cell::Empty,
        Cell::text("Note"),
        Cell::text("n/a"),
        Cell::Empty,
    ]);
    sheet.push_row(vec![
        Cell::text("02"),
        Cell::text("Museum"),
        Cell::text("1,250.00"),
        Cell::Empty,
    ]);

    let mut ledger = Ledger::new();
    let report = ledger.import_all(&Workbook {
        sheets: vec![sheet],
    });
    assert!(!report.has_issues());
    assert_eq!(ledger.record("Şuşa").unwrap().used_amount(), dec!(1250));
}

#[test]
fn test_import_bad_amount_fails_only_that_sheet() {
    let mut sheet = Sheet::new("Xaçmaz");
    sheet.push_row(header_row());
    sheet.push_row(text_row(&["01", "Dam", "lots"]));

    let mut ledger = Ledger::new();
    let report = ledger.import_all(&Workbook {
        sheets: vec![sheet],
    });
    assert_eq!(report.imported_count(), 0);
    assert!(matches!(
        &report.issues[0],
        ImportIssue::Failed(LedgerError::ImportParseFailed { sheet, .. }) if sheet == "Xaçmaz"
    ));
}

#[test]
fn test_import_rejects_negative_amount() {
    let mut sheet = Sheet::new("Zaqatala");
    sheet.push_row(header_row());
    sheet.push_row(vec![
        Cell::text("01"),
        Cell::text("Refund"),
        Cell::Number(dec!(-5)),
    ]);

    let mut ledger = Ledger::new();
    let report = ledger.import_all(&Workbook {
        sheets: vec![sheet],
    });
    assert!(report.has_issues());
    assert!(ledger.is_empty());
}

#[test]
fn test_import_replaces_existing_region() {
    let mut ledger = sample_ledger();
    let created = ledger.record("Bakı").unwrap().created_at();

    let mut sheet = Sheet::new("Bakı");
    sheet.push_row(header_row());
    sheet.push_row(vec![
        Cell::text("09"),
        Cell::text("Metro"),
        Cell::Number(dec!(1000)),
    ]);
    ledger.import_all(&Workbook {
        sheets: vec![sheet],
    });

    let record = ledger.record("Bakı").unwrap();
    assert_eq!(record.items().len(), 1);
    assert_eq!(record.items()[0].number, "09");
    assert_eq!(record.total_budget(), dec!(1100));
    assert_eq!(record.created_at(), created);
    assert!(ledger.contains("Quba"));
}

#[test]
fn test_import_overflowing_amounts_fail_only_that_sheet() {
    let mut huge = Sheet::new("Quba");
    huge.push_row(header_row());
    huge.push_row(text_row(&["01", "X", "75000000000000000000000000000"]));

    let mut good = Sheet::new("Şəki");
    good.push_row(header_row());
    good.push_row(vec![
        Cell::text("01"),
        Cell::text("Bridges"),
        Cell::Number(dec!(200)),
    ]);

    let mut ledger = Ledger::new();
    let report = ledger.import_all(&Workbook {
        sheets: vec![huge, good],
    });

    assert_eq!(report.imported, vec!["Şəki"]);
    assert!(matches!(
        &report.issues[0],
        ImportIssue::Failed(LedgerError::ImportParseFailed { sheet, reason })
            if sheet == "Quba" && reason.contains("overflow")
    ));
    assert!(!ledger.contains("Quba"));
}

#[test]
fn test_import_skips_rows_without_name() {
    let mut sheet = Sheet::new("Şamaxı");
    sheet.push_row(header_row());
    sheet.push_row(vec![Cell::text("01"), Cell::Empty, Cell::Number(dec!(70))]);
    sheet.push_row(vec![
        Cell::text("02"),
        Cell::text("Vineyard"),
        Cell::Number(dec!(30)),
    ]);

    let mut ledger = Ledger::new();
    let report = ledger.import_all(&Workbook {
        sheets: vec![sheet],
    });

    assert_eq!(report.imported, vec!["Şamaxı"]);
    assert_eq!(
        report.issues,
        vec![ImportIssue::RowSkipped {
            sheet: "Şamaxı".into(),
            row: 2,
            reason: "item 01 has no name".into(),
        }]
    );
    let record = ledger.record("Şamaxı").unwrap();
    assert_eq!(record.items().len(), 1);
    assert_eq!(record.used_amount(), dec!(30));
    assert_eq!(report.describe(), "Imported 1 region (1 warning)");
}

#[test]
fn test_import_header_only_sheet_gives_empty_region() {
    let mut sheet = Sheet::new("Kəlbəcər");
    sheet.push_row(header_row());

    let mut ledger = Ledger::new();
    let report = ledger.import_all(&Workbook {
        sheets: vec![sheet],
    });

    assert_eq!(report.imported, vec!["Kəlbəcər"]);
    let record = ledger.record("Kəlbəcər").unwrap();
    assert!(record.items().is_empty());
    assert_eq!(record.total_budget(), Decimal::ZERO);
}

// ── File codecs ───────────────────────────────────────────────

#[test]
fn test_xlsx_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.xlsx");
    let original = sample_ledger();

    xlsx::write_workbook(&original.export_all(), &path).unwrap();
    let (book, issues) = xlsx::read_workbook(&path).unwrap();
    assert!(issues.is_empty());
    assert_eq!(book.sheet_names(), vec!["Bakı", "Quba"]);

    let mut restored = Ledger::new();
    let report = restored.import_all(&book);
    assert_eq!(report.imported_count(), 2);
    let quba = restored.record("Quba").unwrap();
    assert_eq!(quba.items()[0].number, "01");
    assert_eq!(quba.items()[0].name, "Schools");
    assert_eq!(quba.used_amount(), dec!(370.5));
}

#[test]
fn test_read_xlsx_missing_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(xlsx::read_workbook(&dir.path().join("nope.xlsx")).is_err());
}

#[test]
fn test_csv_dir_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("export");

    let written = csv_io::write_workbook_dir(&sample_ledger().export_all(), &out).unwrap();
    assert_eq!(written.len(), 2);
    assert!(out.join("Bakı.csv").exists());

    let (book, issues) = csv_io::read_workbook_dir(&out).unwrap();
    assert!(issues.is_empty());
    assert_eq!(book.sheet_names(), vec!["Bakı", "Quba"]);
    assert_eq!(book.sheet("Bakı").unwrap().rows[1][2], Cell::Number(dec!(500)));

    let mut restored = Ledger::new();
    restored.import_all(&book);
    assert_eq!(restored.record("Bakı").unwrap().total_budget(), dec!(550));
}

#[test]
fn test_csv_read_sheet_named_after_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Qəbələ.csv");
    std::fs::write(&path, "Item Number,Item Name,Amount\n01,Tourism,300\n").unwrap();

    let sheet = csv_io::read_sheet(&path).unwrap();
    assert_eq!(sheet.name, "Qəbələ");
    assert_eq!(sheet.rows[1][2], Cell::Number(dec!(300)));
}

#[test]
fn test_csv_dir_ignores_other_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(
        dir.path().join("Ağdam.csv"),
        "Item Number,Item Name,Amount\n01,Farms,40\n",
    )
    .unwrap();

    let (book, _) = csv_io::read_workbook_dir(dir.path()).unwrap();
    assert_eq!(book.sheet_names(), vec!["Ağdam"]);
}
