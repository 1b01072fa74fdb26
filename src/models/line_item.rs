use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::calculate_percentage;

/// One budget line inside a region's record.
///
/// The percentage share is never stored; see [`LineItem::percentage_of`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub number: String,
    pub name: String,
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(number: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            amount,
        }
    }

    /// Share of `total` taken by this item, in percent rounded to 2 places.
    pub fn percentage_of(&self, total: Decimal) -> Decimal {
        calculate_percentage(self.amount, total)
    }
}

/// Sum of the items' amounts, or `None` if it does not fit in a `Decimal`.
pub(crate) fn sum_amounts<'a>(
    items: impl IntoIterator<Item = &'a LineItem>,
) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.amount))
}
