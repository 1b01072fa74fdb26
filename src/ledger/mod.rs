//! The region → budget record mapping and every operation that mutates it.

mod error;
mod percent;
mod report;
mod shared;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{BudgetRecord, LineItem, Summary};

pub use error::LedgerError;
pub use percent::{calculate_percentage, format_percentage};
pub use report::{ImportIssue, ImportReport};
pub use shared::SharedLedger;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// In-memory budget ledger for one session.
///
/// Regions are kept in name order. Constructed at session start and dropped
/// at session end; nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: BTreeMap<String, BudgetRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, region: &str) -> Option<&BudgetRecord> {
        self.records.get(region.trim())
    }

    pub fn contains(&self, region: &str) -> bool {
        self.records.contains_key(region.trim())
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BudgetRecord)> + '_ {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set the ceiling for `region`, creating an empty record if needed.
    ///
    /// Lowering the ceiling below the current items' sum is accepted; the
    /// record then reports itself over budget until the items or the ceiling
    /// are corrected.
    pub fn set_total_budget(&mut self, region: &str, amount: Decimal) -> LedgerResult<()> {
        let region = require_text(region, "region")?;
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid("total budget must not be negative"));
        }

        match self.records.get_mut(&region) {
            Some(record) => {
                record.set_total_budget(amount);
                if record.is_over_budget() {
                    debug!(%region, %amount, used = %record.used_amount(), "ceiling lowered below items");
                } else {
                    debug!(%region, %amount, "ceiling updated");
                }
            }
            None => {
                debug!(%region, %amount, "record created");
                self.records.insert(region, BudgetRecord::new(amount));
            }
        }
        Ok(())
    }

    /// Append an item to `region`. Returns the new item's index.
    pub fn add_item(
        &mut self,
        region: &str,
        number: &str,
        name: &str,
        amount: Decimal,
    ) -> LedgerResult<usize> {
        let record = self.record_mut(region)?;
        let number = require_text(number, "item number")?;
        let name = require_text(name, "item name")?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid("item amount must be greater than zero"));
        }

        let attempted = record
            .used_amount()
            .checked_add(amount)
            .ok_or_else(too_large)?;
        check_ceiling(attempted, record.total_budget())?;

        record.push_item(LineItem::new(number, name, amount));
        let index = record.items().len() - 1;
        debug!(region = region.trim(), index, %amount, "item added");
        Ok(index)
    }

    /// Overwrite the item at `index` in place.
    pub fn update_item(
        &mut self,
        region: &str,
        index: usize,
        number: &str,
        name: &str,
        amount: Decimal,
    ) -> LedgerResult<()> {
        let record = self.record_mut(region)?;
        let current = record
            .items()
            .get(index)
            .map(|item| item.amount)
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: record.items().len(),
            })?;
        let number = require_text(number, "item number")?;
        let name = require_text(name, "item name")?;
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid("item amount must not be negative"));
        }

        let attempted = (record.used_amount() - current)
            .checked_add(amount)
            .ok_or_else(too_large)?;
        check_ceiling(attempted, record.total_budget())?;

        record.replace_item(index, LineItem::new(number, name, amount));
        debug!(region = region.trim(), index, %amount, "item updated");
        Ok(())
    }

    /// Remove and return the item at `index`; later items shift up by one.
    pub fn delete_item(&mut self, region: &str, index: usize) -> LedgerResult<LineItem> {
        let record = self.record_mut(region)?;
        let len = record.items().len();
        let removed = record
            .remove_item(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        debug!(region = region.trim(), index, "item deleted");
        Ok(removed)
    }

    /// Remove a whole region. Absent regions are reported, not ignored.
    pub fn delete_region(&mut self, region: &str) -> LedgerResult<BudgetRecord> {
        let key = region.trim();
        let removed = self
            .records
            .remove(key)
            .ok_or_else(|| LedgerError::NotFound(key.to_string()))?;
        debug!(region = key, "region deleted");
        Ok(removed)
    }

    /// Drop every record. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        debug!(count, "ledger cleared");
        count
    }

    /// Recompute totals for `region` from its current items.
    pub fn summary(&self, region: &str) -> LedgerResult<Summary> {
        self.record(region)
            .map(BudgetRecord::summary)
            .ok_or_else(|| LedgerError::NotFound(region.trim().to_string()))
    }

    /// Insert or replace a whole record. Bulk imports use this; an existing
    /// record keeps its original creation time.
    pub(crate) fn put_record(&mut self, region: String, record: BudgetRecord) {
        let record = match self.records.get(&region) {
            Some(existing) => BudgetRecord::with_items(
                record.total_budget(),
                record.items().to_vec(),
                existing.created_at(),
            ),
            None => record,
        };
        self.records.insert(region, record);
    }

    fn record_mut(&mut self, region: &str) -> LedgerResult<&mut BudgetRecord> {
        let key = region.trim();
        self.records
            .get_mut(key)
            .ok_or_else(|| LedgerError::NotFound(key.to_string()))
    }
}

fn require_text(value: &str, field: &str) -> LedgerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn check_ceiling(attempted: Decimal, ceiling: Decimal) -> LedgerResult<()> {
    if attempted > ceiling {
        return Err(LedgerError::BudgetExceeded { attempted, ceiling });
    }
    Ok(())
}

fn too_large() -> LedgerError {
    LedgerError::invalid("items total is too large to represent")
}
