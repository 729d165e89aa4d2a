//! YAML Export functionality
//!
//! Same envelope as the JSON export, preceded by a comment header.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::BudgetExport;
use crate::models::Budget;

/// Export a budget to YAML
pub fn export_budget_yaml<W: Write>(budget: &Budget, writer: &mut W) -> BudgetResult<()> {
    let export = BudgetExport::new(budget);
    let export_err = |e: std::io::Error| BudgetError::Export(e.to_string());

    writeln!(writer, "# budget-calc export: {}", export.budget.name).map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a YAML export; comment lines are ignored by the parser
pub fn import_from_yaml(yaml_str: &str) -> BudgetResult<BudgetExport> {
    let export: BudgetExport =
        serde_yaml::from_str(yaml_str).map_err(|e| BudgetError::Import(e.to_string()))?;

    export.validate().map_err(BudgetError::Import)?;

    Ok(export)
}
