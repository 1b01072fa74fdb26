//! Smeta keeps per-region budget ledgers in memory and exchanges them as
//! spreadsheets (xlsx / csv) or JSON.
//!
//! The [`ledger::Ledger`] owns every region's [`models::BudgetRecord`] and is
//! the only way to mutate one; the terminal front-end in the `smeta` binary
//! only calls its operations and renders the results.

pub mod files;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod settings;
pub mod sheet;
pub mod snapshot;
