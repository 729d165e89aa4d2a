//! CSV Export functionality
//!
//! Writes a budget in the flat `type,name,value` form:
//!
//! ```text
//! type,name,value
//! expense,<name>,<value>
//! income,<name>,<value>
//! goal,goal,<goal>
//! reserves,reserves,<reserves>
//! ```
//!
//! Fields are joined with plain commas and are not quoted, so a name that
//! contains a comma or a newline will not survive a round trip.

use rust_decimal::Decimal;
use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, GroupKind};

/// Header row of every budget CSV
pub const CSV_HEADER: &str = "type,name,value";

/// Row type used for the goal row
pub const GOAL_ROW: &str = "goal";

/// Row type used for the reserves row
pub const RESERVES_ROW: &str = "reserves";

/// Cell text for a value that is not a number; the importer reads it back as one
pub const NOT_A_NUMBER: &str = "NaN";

/// Render a number the way it was typed: no trailing zeros, `NaN` when missing
fn format_value(value: Option<Decimal>) -> String {
    value
        .map(|v| v.normalize().to_string())
        .unwrap_or_else(|| NOT_A_NUMBER.to_string())
}

/// Convert a budget to CSV text
pub fn budget_to_csv(budget: &Budget) -> String {
    let mut rows = Vec::with_capacity(budget.expenses.len() + budget.incomes.len() + 3);
    rows.push(CSV_HEADER.to_string());

    for kind in [GroupKind::Expense, GroupKind::Income] {
        rows.extend(
            budget
                .group(kind)
                .items
                .iter()
                .map(|item| format!("{},{},{}", kind, item.name, format_value(item.value))),
        );
    }

    rows.push(format!(
        "{},{},{}",
        GOAL_ROW,
        GOAL_ROW,
        format_value(budget.stats.goal)
    ));
    rows.push(format!(
        "{},{},{}",
        RESERVES_ROW,
        RESERVES_ROW,
        format_value(Some(budget.stats.reserves))
    ));

    rows.join("\n")
}

/// Write a budget as CSV text to `writer`
pub fn write_budget_csv<W: Write>(budget: &Budget, writer: &mut W) -> BudgetResult<()> {
    writer
        .write_all(budget_to_csv(budget).as_bytes())
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}
