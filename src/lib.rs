//! budget-calc - personal budget calculator
//!
//! This library keeps a budget of expense and income line items, derives
//! its statistics (available funds, goal-adjusted funds, amount saved), and
//! converts budgets to and from a flat CSV form.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Budget, line items, and statistics
//! - `locale`: Locale-aware number parsing and currency formatting
//! - `services`: Statistics engine, CSV import, and budget editing
//! - `storage`: JSON budget documents with atomic writes
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `budget` binary
//!
//! # Example
//!
//! ```rust
//! use budget_calc::export::budget_to_csv;
//! use budget_calc::models::Budget;
//! use budget_calc::services::import::budget_from_csv;
//!
//! let budget = Budget::create_new();
//! let csv = budget_to_csv(&budget);
//! let copy = budget_from_csv(csv.as_bytes(), budget.name.clone()).unwrap();
//! assert_eq!(copy.name, budget.name);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod locale;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
