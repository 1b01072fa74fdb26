use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{sum_amounts, LineItem, Summary};

/// A region's ceiling and its ordered line items.
///
/// Fields are private: every mutation goes through [`crate::ledger::Ledger`],
/// which enforces the ceiling before touching the items.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRecord {
    total_budget: Decimal,
    items: Vec<LineItem>,
    created_at: DateTime<Utc>,
}

impl BudgetRecord {
    pub(crate) fn new(total_budget: Decimal) -> Self {
        Self::with_items(total_budget, Vec::new(), Utc::now())
    }

    pub(crate) fn with_items(
        total_budget: Decimal,
        items: Vec<LineItem>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            total_budget,
            items,
            created_at,
        }
    }

    pub fn total_budget(&self) -> Decimal {
        self.total_budget
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of the item amounts, saturating at `Decimal::MAX`.
    pub fn used_amount(&self) -> Decimal {
        sum_amounts(&self.items).unwrap_or(Decimal::MAX)
    }

    pub fn summary(&self) -> Summary {
        Summary::new(self.total_budget, self.used_amount())
    }

    pub fn is_over_budget(&self) -> bool {
        self.used_amount() > self.total_budget
    }

    /// Items paired with their percentage of the current ceiling.
    pub fn items_with_percentages(&self) -> impl Iterator<Item = (&LineItem, Decimal)> + '_ {
        self.items
            .iter()
            .map(move |item| (item, item.percentage_of(self.total_budget)))
    }

    pub(crate) fn set_total_budget(&mut self, amount: Decimal) {
        self.total_budget = amount;
    }

    pub(crate) fn push_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub(crate) fn replace_item(&mut self, index: usize, item: LineItem) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = item;
        }
    }

    pub(crate) fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}
