//! Budget service
//!
//! Applies one edit at a time to a budget and re-runs the statistics pass
//! after each, so a budget's figures always match its items and goal.

use rust_decimal::Decimal;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetId, GroupKind, LineItem};
use crate::services::stats;

/// Entry in a budget picker: id and display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetListing {
    pub id: BudgetId,
    pub name: String,
}

/// Picker entries for every budget that has a name, in input order
pub fn list_names(budgets: &[Budget]) -> Vec<BudgetListing> {
    budgets
        .iter()
        .filter(|b| !b.name.trim().is_empty())
        .map(|b| BudgetListing {
            id: b.id,
            name: b.name.clone(),
        })
        .collect()
}

/// Service for editing a single budget
pub struct BudgetEditor<'a> {
    budget: &'a mut Budget,
}

impl<'a> BudgetEditor<'a> {
    /// Create an editor over `budget`
    pub fn new(budget: &'a mut Budget) -> Self {
        Self { budget }
    }

    /// The budget being edited
    pub fn budget(&self) -> &Budget {
        self.budget
    }

    /// Append a line item to a group; returns the new item
    pub fn add_item(
        &mut self,
        kind: GroupKind,
        name: impl Into<String>,
        value: Option<Decimal>,
    ) -> LineItem {
        let group = self.budget.group_mut(kind);
        let item = LineItem::with_value(group.next_id(), name, value);
        group.items.push(item.clone());

        tracing::debug!(budget = %self.budget.id, group = %kind, item = item.id, "added item");
        self.refresh();
        item
    }

    /// Change an item's name and/or value; `None` leaves a field as it is
    pub fn update_item(
        &mut self,
        kind: GroupKind,
        id: i64,
        name: Option<String>,
        value: Option<Option<Decimal>>,
    ) -> BudgetResult<LineItem> {
        let item = self.item_mut(kind, id)?;
        if let Some(name) = name {
            item.name = name;
        }
        if let Some(value) = value {
            item.value = value;
        }
        let updated = item.clone();

        self.refresh();
        Ok(updated)
    }

    /// Apply an arithmetic step to an item's value
    ///
    /// Follows [`stats::apply_operation`]: the result is clamped at zero and
    /// is zero when the item has no value or `delta` is not positive.
    pub fn adjust_item(
        &mut self,
        kind: GroupKind,
        id: i64,
        delta: Option<Decimal>,
        op: &str,
    ) -> BudgetResult<LineItem> {
        let item = self.item_mut(kind, id)?;
        item.value = Some(stats::apply_operation(item.value, delta, op)?);
        let updated = item.clone();

        self.refresh();
        Ok(updated)
    }

    /// Delete an item; returns what was removed
    pub fn remove_item(&mut self, kind: GroupKind, id: i64) -> BudgetResult<LineItem> {
        let group = self.budget.group_mut(kind);
        let position = group
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| BudgetError::item_not_found(format!("{} {}", kind, id)))?;
        let removed = group.items.remove(position);

        self.refresh();
        Ok(removed)
    }

    /// Set the goal percentage; `None` clears it
    pub fn set_goal(&mut self, goal: Option<Decimal>) {
        self.budget.stats.goal = goal;
        self.refresh();
    }

    /// Set the goal to the auto-computed percentage; returns the new goal
    pub fn apply_auto_goal(&mut self) -> Decimal {
        let goal = stats::auto_goal(self.budget);
        self.set_goal(Some(goal));
        goal
    }

    /// Set the reserves amount
    pub fn set_reserves(&mut self, reserves: Decimal) {
        self.budget.stats.reserves = reserves;
        self.refresh();
    }

    /// Rename the budget; the name must not be blank
    pub fn rename(&mut self, name: impl Into<String>) -> BudgetResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BudgetError::Validation("Budget name cannot be empty".into()));
        }
        self.budget.name = name;
        Ok(())
    }

    fn item_mut(&mut self, kind: GroupKind, id: i64) -> BudgetResult<&mut LineItem> {
        self.budget
            .group_mut(kind)
            .find_mut(id)
            .ok_or_else(|| BudgetError::item_not_found(format!("{} {}", kind, id)))
    }

    fn refresh(&mut self) {
        stats::recompute(self.budget);
    }
}
