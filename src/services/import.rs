//! CSV Import service
//!
//! Builds a budget from the `type,name,value` text written by
//! [`crate::export::csv`]. Each row's `type` is parsed once into a
//! [`RowKind`]; rows of a kind this crate does not know are skipped rather
//! than rejected, so callers that need strict validation must check the
//! rows themselves (see [`parse_csv`]).

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;

use crate::error::BudgetResult;
use crate::locale::parse_decimal;
use crate::models::{Budget, GroupKind, LineItem};
use crate::services::stats;

/// What a CSV row describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Expense,
    Income,
    Goal,
    Reserves,
    /// Any other `type` value, kept for diagnostics
    Unknown(String),
}

impl RowKind {
    /// The line-item group this row belongs to, if it is a line item
    pub fn group(&self) -> Option<GroupKind> {
        match self {
            RowKind::Expense => Some(GroupKind::Expense),
            RowKind::Income => Some(GroupKind::Income),
            _ => None,
        }
    }
}

impl From<&str> for RowKind {
    fn from(s: &str) -> Self {
        match s.trim() {
            "expense" => RowKind::Expense,
            "income" => RowKind::Income,
            "goal" => RowKind::Goal,
            "reserves" => RowKind::Reserves,
            other => RowKind::Unknown(other.to_string()),
        }
    }
}

/// One data row of a budget CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub kind: RowKind,
    pub name: String,
    /// Parsed value; an empty cell reads as zero, `None` when not a number
    pub value: Option<Decimal>,
}

impl CsvRow {
    pub fn new(kind: impl Into<RowKind>, name: impl Into<String>, value: &str) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            value: parse_cell(value),
        }
    }
}

/// Read a value cell: blank is zero, anything else must be a number
fn parse_cell(cell: &str) -> Option<Decimal> {
    if cell.trim().is_empty() {
        Some(Decimal::ZERO)
    } else {
        parse_decimal(cell)
    }
}

/// Column positions of the three fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumns {
    pub type_column: usize,
    pub name_column: usize,
    pub value_column: usize,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            type_column: 0,
            name_column: 1,
            value_column: 2,
        }
    }
}

impl CsvColumns {
    /// Locate the columns by header name, keeping the default position for
    /// any header that is missing
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            match header.trim().to_lowercase().as_str() {
                "type" => columns.type_column = idx,
                "name" => columns.name_column = idx,
                "value" => columns.value_column = idx,
                _ => {}
            }
        }

        columns
    }

    /// Read a record; missing cells are treated as empty
    pub fn parse_record(&self, record: &StringRecord) -> CsvRow {
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        CsvRow::new(
            cell(self.type_column),
            cell(self.name_column),
            cell(self.value_column),
        )
    }
}

/// Parse budget CSV text into rows
///
/// The first line is the header. Fields are split on commas with no quote
/// handling, matching what the exporter writes. Rows may have more or fewer
/// fields than the header.
pub fn parse_csv<R: Read>(reader: R) -> BudgetResult<Vec<CsvRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let columns = CsvColumns::from_headers(csv_reader.headers()?);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(columns.parse_record(&record));
    }

    tracing::debug!(rows = rows.len(), "parsed budget csv");
    Ok(rows)
}

/// Append a row to a group and refresh that group's total
fn push_item(budget: &mut Budget, kind: GroupKind, index: usize, row: &CsvRow) {
    let group = budget.group_mut(kind);
    group
        .items
        .push(LineItem::with_value(index as i64, row.name.clone(), row.value));
    group.total = stats::round(stats::sum(&group.items), stats::MONEY_PRECISION);
}

/// Build a new budget from parsed rows
///
/// The budget gets a fresh id and `name`. Line items take their row's
/// position as id, so expense and income ids share one sequence. Goal and
/// reserves rows set those inputs; other rows are skipped. All statistics
/// are recomputed at the end.
pub fn budget_from_rows(rows: &[CsvRow], name: impl Into<String>) -> Budget {
    let mut budget = Budget::empty(name);

    for (index, row) in rows.iter().enumerate() {
        match &row.kind {
            RowKind::Expense => push_item(&mut budget, GroupKind::Expense, index, row),
            RowKind::Income => push_item(&mut budget, GroupKind::Income, index, row),
            RowKind::Goal => budget.stats.goal = row.value,
            RowKind::Reserves => {
                budget.stats.reserves = row.value.unwrap_or_else(|| {
                    tracing::warn!(row = index, "reserves value is not a number, using 0");
                    Decimal::ZERO
                });
            }
            RowKind::Unknown(kind) => {
                tracing::debug!(row = index, kind = %kind, "skipping row of unknown type");
            }
        }
    }

    stats::recompute(&mut budget);
    budget
}

/// Read budget CSV text and build a budget named `name`
pub fn budget_from_csv<R: Read>(reader: R, name: impl Into<String>) -> BudgetResult<Budget> {
    let rows = parse_csv(reader)?;
    Ok(budget_from_rows(&rows, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::csv::budget_to_csv;
    use crate::models::LineItemGroup;
    use rust_decimal_macros::dec;

    fn pairs(group: &LineItemGroup) -> Vec<(String, Option<Decimal>)> {
        group
            .items
            .iter()
            .map(|item| (item.name.clone(), item.value))
            .collect()
    }

    #[test]
    fn test_row_kind_parsing() {
        assert_eq!(RowKind::from("expense"), RowKind::Expense);
        assert_eq!(RowKind::from("income"), RowKind::Income);
        assert_eq!(RowKind::from("goal"), RowKind::Goal);
        assert_eq!(RowKind::from("reserves"), RowKind::Reserves);
        assert_eq!(RowKind::from("Expense"), RowKind::Unknown("Expense".into()));
        assert_eq!(RowKind::Expense.group(), Some(GroupKind::Expense));
        assert_eq!(RowKind::Goal.group(), None);
    }

    #[test]
    fn test_budget_from_csv() {
        let csv = "type,name,value\n\
                   expense,Rent,950\n\
                   income,Salary,2500\n\
                   expense,Food,320.5\n\
                   goal,goal,15\n\
                   reserves,reserves,1000";

        let budget = budget_from_csv(csv.as_bytes(), "2024-01").unwrap();

        assert_eq!(budget.name, "2024-01");
        assert_eq!(
            budget.expenses.items,
            vec![
                LineItem::new(0, "Rent", dec!(950)),
                LineItem::new(2, "Food", dec!(320.5)),
            ]
        );
        assert_eq!(budget.incomes.items, vec![LineItem::new(1, "Salary", dec!(2500))]);
        assert_eq!(budget.expenses.total, dec!(1270.5));
        assert_eq!(budget.incomes.total, dec!(2500));
        assert_eq!(budget.stats.goal, Some(dec!(15)));
        assert_eq!(budget.stats.reserves, dec!(1000));
        assert_eq!(budget.stats.available, dec!(1229.5));
        assert_eq!(budget.stats.saved, dec!(375));
        assert_eq!(budget.stats.with_goal, dec!(854.5));
    }

    #[test]
    fn test_unknown_rows_are_skipped() {
        let csv = "type,name,value\n\
                   transfer,Savings,100\n\
                   expense,Rent,950\n\
                   ,,\n";

        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();
        assert_eq!(budget.expenses.items, vec![LineItem::new(1, "Rent", dec!(950))]);
        assert!(budget.incomes.is_empty());
    }

    #[test]
    fn test_missing_goal_and_reserves_rows() {
        let csv = "type,name,value\nincome,Job,100";
        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();

        assert_eq!(budget.stats.goal, Some(dec!(0)));
        assert_eq!(budget.stats.reserves, dec!(0));
        assert_eq!(budget.stats.with_goal, dec!(100));
    }

    #[test]
    fn test_non_numeric_cells() {
        let csv = "type,name,value\n\
                   expense,Gym,lots\n\
                   expense,Rent,50\n\
                   income,Job,200\n\
                   goal,goal,NaN\n\
                   reserves,reserves,none";

        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();
        assert_eq!(budget.expenses.items[0].value, None);
        assert_eq!(budget.expenses.total, dec!(50));
        assert_eq!(budget.stats.goal, None);
        assert_eq!(budget.stats.with_goal, dec!(0));
        assert_eq!(budget.stats.saved, dec!(0));
        assert_eq!(budget.stats.reserves, dec!(0));
    }

    #[test]
    fn test_empty_cells_read_as_zero() {
        let csv = "type,name,value\n\
                   expense,Rent,50\n\
                   expense,Spare,\n\
                   income,Job,200\n\
                   goal,goal,  \n\
                   reserves,reserves,";

        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();
        assert_eq!(budget.expenses.items[1].value, Some(dec!(0)));
        assert_eq!(budget.stats.goal, Some(dec!(0)));
        assert_eq!(budget.stats.saved, dec!(0));
        assert_eq!(budget.stats.with_goal, budget.stats.available);
        assert_eq!(budget.stats.available, dec!(150));
        assert_eq!(budget.stats.reserves, dec!(0));
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let csv = "type,name,value\n\
                   expense,a,79228162514264337593543950335\n\
                   expense,b,1\n";

        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();
        assert_eq!(budget.expenses.total, Decimal::MAX);
        assert_eq!(budget.stats.available, Decimal::MIN);
    }

    #[test]
    fn test_columns_located_by_header() {
        let csv = "value,type,name\n12.5,expense,Coffee";
        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();
        assert_eq!(budget.expenses.items, vec![LineItem::new(0, "Coffee", dec!(12.5))]);
    }

    #[test]
    fn test_short_rows_and_quotes() {
        let csv = "type,name,value\nexpense,\"Quoted\" name,3\nexpense,Lonely";
        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();
        assert_eq!(
            budget.expenses.items,
            vec![
                LineItem::new(0, "\"Quoted\" name", dec!(3)),
                LineItem::new(1, "Lonely", dec!(0)),
            ]
        );
    }

    #[test]
    fn test_comma_in_name_corrupts_row() {
        let csv = "type,name,value\nexpense,Rent, flat 2,950";
        let budget = budget_from_csv(csv.as_bytes(), "x").unwrap();
        assert_eq!(budget.expenses.items[0].name, "Rent");
        assert_eq!(budget.expenses.items[0].value, None);
    }

    #[test]
    fn test_round_trip() {
        let mut original = Budget::empty("round-trip");
        original.expenses = LineItemGroup::from_items(vec![
            LineItem::new(1, "Rent", dec!(950.00)),
            LineItem::new(2, "Food & drink", dec!(320.55)),
            LineItem::with_value(3, "Unknown yet", None),
            LineItem::new(4, "", dec!(0)),
        ]);
        original.incomes = LineItemGroup::from_items(vec![
            LineItem::new(1, "Salary", dec!(2500)),
            LineItem::new(2, "Refund", dec!(-12.3)),
        ]);
        original.stats.goal = Some(dec!(12.5));
        original.stats.reserves = dec!(4000.10);
        stats::recompute(&mut original);

        let text = budget_to_csv(&original);
        let restored = budget_from_csv(text.as_bytes(), original.name.clone()).unwrap();

        assert_ne!(restored.id, original.id);
        assert_eq!(restored.name, original.name);
        assert_eq!(pairs(&restored.expenses), pairs(&original.expenses));
        assert_eq!(pairs(&restored.incomes), pairs(&original.incomes));
        assert_eq!(restored.stats, original.stats);
    }

    #[test]
    fn test_round_trip_without_goal() {
        let mut original = Budget::create_new();
        original.stats.goal = None;

        let text = budget_to_csv(&original);
        let restored = budget_from_csv(text.as_bytes(), original.name.clone()).unwrap();
        assert_eq!(restored.stats.goal, None);
        assert_eq!(pairs(&restored.expenses), pairs(&original.expenses));
    }

    #[test]
    fn test_empty_input() {
        let budget = budget_from_csv("".as_bytes(), "x").unwrap();
        assert!(budget.expenses.is_empty());
        assert!(budget.incomes.is_empty());
    }
}
