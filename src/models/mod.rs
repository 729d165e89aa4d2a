//! Core data models for budget-calc
//!
//! This module contains the data structures of the budgeting domain: the
//! budget aggregate, its line-item groups, and its statistics.

pub mod budget;
pub mod ids;
pub mod line_item;

pub use budget::{Budget, GroupKind, LineItemGroup, Stats, DEFAULT_GOAL};
pub use ids::BudgetId;
pub use line_item::LineItem;
