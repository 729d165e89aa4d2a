//! Budget aggregate
//!
//! A budget owns an expense group, an income group, and the statistics
//! derived from them. The statistics are recomputed by
//! [`crate::services::stats::recompute`] after every change to the items
//! or the goal.

use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::BudgetId;
use super::line_item::LineItem;

/// Goal percentage a brand-new budget starts with
pub const DEFAULT_GOAL: Decimal = Decimal::TEN;

/// Which of a budget's two groups an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Expense,
    Income,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Expense => "expense",
            GroupKind::Income => "income",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(GroupKind::Expense),
            "income" | "incomes" => Ok(GroupKind::Income),
            other => Err(format!("unknown group '{}', expected expense or income", other)),
        }
    }
}

/// An ordered list of line items plus its cached total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemGroup {
    /// Items in display order
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Sum of numeric item values, rounded to cents
    #[serde(default)]
    pub total: Decimal,
}

impl LineItemGroup {
    /// Create a group from items; the total is left for the recompute pass
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self {
            items,
            total: Decimal::ZERO,
        }
    }

    pub fn find(&self, id: i64) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// The id the next appended item should get
    pub fn next_id(&self) -> i64 {
        self.items.iter().map(|item| item.id).max().map_or(1, |max| max + 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Derived statistics plus the two user-set inputs (goal and reserves)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Income total minus expense total
    #[serde(default)]
    pub available: Decimal,

    /// Available funds after withholding the goal percentage of income
    #[serde(default)]
    pub with_goal: Decimal,

    /// Goal percentage of the income total
    #[serde(default)]
    pub saved: Decimal,

    /// Target percentage of income to set aside; `None` when not a number
    #[serde(default)]
    pub goal: Option<Decimal>,

    /// Static buffer amount; stored but not used by the derived figures
    #[serde(default)]
    pub reserves: Decimal,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            available: Decimal::ZERO,
            with_goal: Decimal::ZERO,
            saved: Decimal::ZERO,
            goal: Some(Decimal::ZERO),
            reserves: Decimal::ZERO,
        }
    }
}

/// The aggregate root: a named budget of expenses and incomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier, fixed at creation
    pub id: BudgetId,

    /// User-editable display name
    pub name: String,

    pub expenses: LineItemGroup,

    pub incomes: LineItemGroup,

    pub stats: Stats,
}

impl Budget {
    /// Create an empty budget with the given name and a fresh id
    ///
    /// Both groups start empty and the goal starts at zero, which is the
    /// starting point for a CSV import.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            id: BudgetId::new(),
            name: name.into(),
            expenses: LineItemGroup::default(),
            incomes: LineItemGroup::default(),
            stats: Stats::default(),
        }
    }

    /// Create the budget a user gets when starting from scratch
    ///
    /// One blank expense row, one blank income row, a 10% goal, and a name of
    /// the form `<year>-<first 8 chars of the id>`.
    pub fn create_new() -> Self {
        let id = BudgetId::new();
        let name = format!("{}-{}", Local::now().year(), id.short());

        Self {
            id,
            name,
            expenses: LineItemGroup::from_items(vec![LineItem::blank(1)]),
            incomes: LineItemGroup::from_items(vec![LineItem::blank(1)]),
            stats: Stats {
                goal: Some(DEFAULT_GOAL),
                ..Stats::default()
            },
        }
    }

    pub fn group(&self, kind: GroupKind) -> &LineItemGroup {
        match kind {
            GroupKind::Expense => &self.expenses,
            GroupKind::Income => &self.incomes,
        }
    }

    pub fn group_mut(&mut self, kind: GroupKind) -> &mut LineItemGroup {
        match kind {
            GroupKind::Expense => &mut self.expenses,
            GroupKind::Income => &mut self.incomes,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} expenses, {} incomes, available: {})",
            self.name,
            self.expenses.len(),
            self.incomes.len(),
            self.stats.available
        )
    }
}
