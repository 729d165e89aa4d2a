//! Display formatting for terminal output
//!
//! Formats budgets as plain-text tables for the CLI.

pub mod budget;

pub use budget::{format_budget, format_budget_list, format_stats};
