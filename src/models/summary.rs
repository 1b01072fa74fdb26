use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::calculate_percentage;

/// Totals for one region, computed fresh from its record on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_budget: Decimal,
    pub used_amount: Decimal,
    /// Negative when the ceiling was lowered below the items' sum.
    pub remaining_amount: Decimal,
    pub used_percentage: Decimal,
}

impl Summary {
    pub fn new(total_budget: Decimal, used_amount: Decimal) -> Self {
        Self {
            total_budget,
            used_amount,
            remaining_amount: total_budget - used_amount,
            used_percentage: calculate_percentage(used_amount, total_budget),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining_amount < Decimal::ZERO
    }

    /// `100 - used_percentage`, as printed on the spreadsheet's remaining row.
    /// Goes negative once usage passes 100%, so it is not a share of anything.
    pub fn remaining_percentage(&self) -> Decimal {
        Decimal::ONE_HUNDRED - self.used_percentage
    }

    /// Usage ratio clamped to `0.0..=1.0`, for gauges.
    pub fn usage_ratio(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;

        (self.used_percentage / Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }
}
