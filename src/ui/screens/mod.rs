pub(crate) mod files;
pub(crate) mod ledger_view;
pub(crate) mod manage;
pub(crate) mod planning;
