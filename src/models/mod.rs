mod budget_record;
mod line_item;
mod region;
mod summary;

pub use budget_record::BudgetRecord;
pub use line_item::LineItem;
pub(crate) use line_item::sum_amounts;
pub use region::{find_region, REGIONS};
pub use summary::Summary;
