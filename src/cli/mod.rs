//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod config;

pub use budget::{handle_budget_command, BudgetCommands};
pub use config::{handle_config_command, ConfigArgs};
