use rust_decimal::Decimal;
use thiserror::Error;

/// Failures returned by ledger operations. None of them leave partial state
/// behind: a rejected operation changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A required field is missing or out of range.
    #[error("Invalid input: {0}")]
    ValidationFailed(String),

    /// The items would add up to more than the region's ceiling.
    #[error("Items total {attempted} would exceed the budget ceiling {ceiling}")]
    BudgetExceeded { attempted: Decimal, ceiling: Decimal },

    /// The item reference is stale or invalid.
    #[error("Item {index} does not exist ({len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// No record exists for the region.
    #[error("Region not found: {0}")]
    NotFound(String),

    /// One sheet (or JSON record) of an import could not be read.
    #[error("Could not import '{sheet}': {reason}")]
    ImportParseFailed { sheet: String, reason: String },
}

impl LedgerError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }
}
