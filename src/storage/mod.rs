//! Storage layer for budget-calc
//!
//! Budget documents are single JSON files at paths chosen by the user,
//! written atomically.

pub mod file_io;

pub use file_io::{load_budget, read_json_required, save_budget, write_json_atomic};
