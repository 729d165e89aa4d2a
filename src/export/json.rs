//! JSON Export functionality
//!
//! Wraps a budget in an envelope carrying the schema version and export
//! time, so an exported file can be checked before it is read back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::Budget;
use crate::services::stats;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A budget plus export metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub budget: Budget,
}

impl BudgetExport {
    pub fn new(budget: &Budget) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            budget: budget.clone(),
        }
    }

    /// Check the schema version and that the stored statistics match the items
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut fresh = self.budget.clone();
        stats::recompute(&mut fresh);
        if fresh.stats != self.budget.stats
            || fresh.expenses.total != self.budget.expenses.total
            || fresh.incomes.total != self.budget.incomes.total
        {
            return Err(format!(
                "Budget {} has statistics that do not match its items",
                self.budget.id
            ));
        }

        Ok(())
    }

    /// The budget carried by this export
    pub fn into_budget(self) -> Budget {
        self.budget
    }
}

/// Export a budget to JSON
pub fn export_budget_json<W: Write>(
    budget: &Budget,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let export = BudgetExport::new(budget);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}

/// Read back a JSON export
pub fn import_from_json(json_str: &str) -> BudgetResult<BudgetExport> {
    let export: BudgetExport =
        serde_json::from_str(json_str).map_err(|e| BudgetError::Import(e.to_string()))?;

    export.validate().map_err(BudgetError::Import)?;

    Ok(export)
}
