//! Configuration module for budget-calc
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (locale, currency, default goal)

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;
