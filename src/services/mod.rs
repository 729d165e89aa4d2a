//! Service layer for budget-calc
//!
//! The service layer holds the budget logic: the statistics engine, the
//! CSV import, and single-budget editing.

pub mod budget;
pub mod import;
pub mod stats;

pub use budget::{list_names, BudgetEditor, BudgetListing};
pub use import::{budget_from_csv, budget_from_rows, parse_csv, CsvRow, RowKind};
pub use stats::{apply_operation, recompute, Operation};
