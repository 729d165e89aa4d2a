//! Export module for budget-calc
//!
//! Writes a budget in three formats:
//! - CSV: the flat `type,name,value` form, readable by the CSV import
//! - JSON: machine-readable, with schema version
//! - YAML: human-readable, with a comment header

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{BudgetError, BudgetResult};
use crate::models::Budget;
use crate::services::import::budget_from_csv;

pub use self::csv::{budget_to_csv, write_budget_csv, CSV_HEADER};
pub use json::{export_budget_json, import_from_json, BudgetExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_budget_yaml, import_from_yaml};

/// Output format for `export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!("unknown format '{}', expected csv, json or yaml", other)),
        }
    }
}

impl ExportFormat {
    /// Format named by a file's extension, if it is one we write
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

/// Write `budget` to `writer` in `format`; `pretty` only affects JSON
pub fn export_budget<W: Write>(
    budget: &Budget,
    format: ExportFormat,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    match format {
        ExportFormat::Csv => write_budget_csv(budget, writer),
        ExportFormat::Json => export_budget_json(budget, writer, pretty),
        ExportFormat::Yaml => export_budget_yaml(budget, writer),
    }
}

/// Read a budget back from any export format
///
/// CSV carries no id or name, so the budget gets a fresh id and `name`.
/// JSON and YAML exports are validated and keep their own id and name.
pub fn import_budget<R: Read>(
    mut reader: R,
    format: ExportFormat,
    name: impl Into<String>,
) -> BudgetResult<Budget> {
    if format == ExportFormat::Csv {
        return budget_from_csv(reader, name);
    }

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| BudgetError::Import(e.to_string()))?;

    let export = match format {
        ExportFormat::Yaml => import_from_yaml(&text)?,
        _ => import_from_json(&text)?,
    };
    Ok(export.into_budget())
}
