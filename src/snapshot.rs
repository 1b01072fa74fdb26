//! JSON snapshot of the whole ledger, keyed by region name.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ledger::{calculate_percentage, ImportIssue, ImportReport, Ledger, LedgerError};
use crate::models::{sum_amounts, BudgetRecord, LineItem};

#[derive(Debug, Serialize, Deserialize)]
struct RecordDoc {
    total_budget: Decimal,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    items: Vec<ItemDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemDoc {
    number: String,
    name: String,
    amount: Decimal,
    /// Written for readers of the file; recomputed on import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage: Option<Decimal>,
}

impl Ledger {
    /// Pretty-printed JSON object of every record, amounts as strings.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let docs: BTreeMap<&str, RecordDoc> = self
            .iter()
            .map(|(region, record)| (region, RecordDoc::from(record)))
            .collect();
        serde_json::to_string_pretty(&docs)
    }

    /// Load records from a snapshot. Malformed JSON fails the whole call;
    /// a record with invalid values is skipped and reported.
    pub fn import_json(&mut self, json: &str) -> serde_json::Result<ImportReport> {
        let docs: BTreeMap<String, RecordDoc> = serde_json::from_str(json)?;
        let mut report = ImportReport::default();

        for (region, doc) in docs {
            match doc.into_record(&region) {
                Ok(record) => {
                    info!(%region, items = record.items().len(), "record loaded from json");
                    self.put_record(region.trim().to_string(), record);
                    report.imported.push(region.trim().to_string());
                }
                Err(e) => {
                    warn!(%region, "{e}");
                    report.issues.push(ImportIssue::Failed(e));
                }
            }
        }
        Ok(report)
    }
}

impl From<&BudgetRecord> for RecordDoc {
    fn from(record: &BudgetRecord) -> Self {
        let items = record
            .items()
            .iter()
            .map(|item| ItemDoc {
                number: item.number.clone(),
                name: item.name.clone(),
                amount: item.amount,
                percentage: Some(calculate_percentage(item.amount, record.total_budget()).normalize()),
            })
            .collect();
        Self {
            total_budget: record.total_budget(),
            created_at: record.created_at(),
            items,
        }
    }
}

impl RecordDoc {
    fn into_record(self, region: &str) -> Result<BudgetRecord, LedgerError> {
        let fail = |reason: String| LedgerError::ImportParseFailed {
            sheet: region.to_string(),
            reason,
        };

        if region.trim().is_empty() {
            return Err(fail("region name is empty".into()));
        }
        if self.total_budget < Decimal::ZERO {
            return Err(fail(format!("total budget {} is negative", self.total_budget)));
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (i, item) in self.items.into_iter().enumerate() {
            if item.number.trim().is_empty() || item.name.trim().is_empty() {
                return Err(fail(format!("item {} has an empty number or name", i + 1)));
            }
            if item.amount < Decimal::ZERO {
                return Err(fail(format!("item {} has a negative amount", i + 1)));
            }
            items.push(LineItem::new(item.number.trim(), item.name.trim(), item.amount));
        }

        let used = sum_amounts(&items).ok_or_else(|| fail("amounts overflow".into()))?;
        if used > self.total_budget {
            return Err(fail(format!(
                "items total {used} exceeds the budget of {}",
                self.total_budget
            )));
        }

        Ok(BudgetRecord::with_items(self.total_budget, items, self.created_at))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.set_total_budget("Gəncə", dec!(800)).unwrap();
        ledger.add_item("Gəncə", "01", "Stadium", dec!(200)).unwrap();
        ledger.add_item("Gəncə", "02", "Library", dec!(50.25)).unwrap();
        ledger.set_total_budget("Naxçıvan", dec!(0)).unwrap();
        ledger
    }

    #[test]
    fn test_export_json_shape() {
        let json = sample().export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["Gəncə"]["total_budget"], "800");
        assert_eq!(value["Gəncə"]["items"][0]["number"], "01");
        assert_eq!(value["Gəncə"]["items"][1]["amount"], "50.25");
        assert_eq!(value["Gəncə"]["items"][0]["percentage"], "25");
        assert!(value["Naxçıvan"]["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_json_round_trip_keeps_ceiling_and_timestamp() {
        let original = sample();
        let json = original.export_json().unwrap();

        let mut restored = Ledger::new();
        let report = restored.import_json(&json).unwrap();
        assert_eq!(report.imported, vec!["Gəncə", "Naxçıvan"]);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_import_json_ignores_percentage() {
        let json = r#"{"Quba": {"total_budget": "100", "items": [
            {"number": "01", "name": "Apples", "amount": "40", "percentage": "99"}
        ]}}"#;
        let mut ledger = Ledger::new();
        ledger.import_json(json).unwrap();
        let (_, pct) = ledger
            .record("Quba")
            .unwrap()
            .items_with_percentages()
            .next()
            .unwrap();
        assert_eq!(pct, dec!(40));
    }

    #[test]
    fn test_import_json_skips_invalid_record() {
        let json = r#"{
            "Bakı": {"total_budget": "100", "items": [
                {"number": "01", "name": "Roads", "amount": "150"}
            ]},
            "Şirvan": {"total_budget": "50"}
        }"#;
        let mut ledger = Ledger::new();
        let report = ledger.import_json(json).unwrap();

        assert_eq!(report.imported, vec!["Şirvan"]);
        assert_eq!(report.issues.len(), 1);
        assert!(!ledger.contains("Bakı"));
    }

    #[test]
    fn test_import_json_overflowing_items_skip_record() {
        let json = r#"{
            "Quba": {"total_budget": "79228162514264337593543950335", "items": [
                {"number": "01", "name": "Dam", "amount": "79228162514264337593543950335"},
                {"number": "02", "name": "Canal", "amount": "1"}
            ]},
            "Şirvan": {"total_budget": "50"}
        }"#;
        let mut ledger = Ledger::new();
        let report = ledger.import_json(json).unwrap();

        assert_eq!(report.imported, vec!["Şirvan"]);
        assert!(matches!(
            &report.issues[0],
            ImportIssue::Failed(LedgerError::ImportParseFailed { sheet, reason })
                if sheet == "Quba" && reason.contains("overflow")
        ));
        assert!(!ledger.contains("Quba"));
    }

    #[test]
    fn test_import_json_malformed_is_error() {
        let mut ledger = Ledger::new();
        assert!(ledger.import_json("{ not json").is_err());
        assert!(ledger.import_json(r#"{"X": {"total_budget": "abc"}}"#).is_err());
        assert!(ledger.is_empty());
    }
}
