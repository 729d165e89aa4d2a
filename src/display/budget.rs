//! Budget display formatting
//!
//! Renders a budget's two groups as tables and its statistics as a
//! summary block, with amounts in the session's currency.

use rust_decimal::Decimal;

use crate::locale::LocaleContext;
use crate::models::{Budget, GroupKind, LineItemGroup};
use crate::services::budget::BudgetListing;
use crate::services::stats;

/// Text shown for an item whose value is not a number
const NOT_A_NUMBER: &str = "-";

fn format_group(
    group: &LineItemGroup,
    kind: GroupKind,
    percentages: &[(i64, Decimal)],
    locale: &LocaleContext,
) -> String {
    let title = match kind {
        GroupKind::Expense => "Expenses",
        GroupKind::Income => "Incomes",
    };

    let mut output = String::new();
    output.push_str(&format!("{}\n", title));

    if group.is_empty() {
        output.push_str("  (no items)\n");
        return output;
    }

    let name_width = group
        .items
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    output.push_str(&format!(
        "  {:>4}  {:<width$}  {:>14}  {:>6}\n",
        "ID",
        "Name",
        "Amount",
        if kind == GroupKind::Expense { "Share" } else { "" },
        width = name_width
    ));
    output.push_str(&format!(
        "  {:-<4}  {:-<width$}  {:->14}  {:->6}\n",
        "",
        "",
        "",
        "",
        width = name_width
    ));

    for item in &group.items {
        let amount = item
            .value
            .map(|v| locale.format(v))
            .unwrap_or_else(|| NOT_A_NUMBER.to_string());
        let share = percentages
            .iter()
            .find(|(id, _)| *id == item.id)
            .map(|(_, pct)| format!("{}%", pct))
            .unwrap_or_default();

        output.push_str(&format!(
            "  {:>4}  {:<width$}  {:>14}  {:>6}\n",
            item.id,
            item.name,
            amount,
            share,
            width = name_width
        ));
    }

    output.push_str(&format!(
        "  {:>4}  {:<width$}  {:>14}\n",
        "",
        "Total",
        locale.format(group.total),
        width = name_width
    ));

    output
}

/// Format the statistics block
pub fn format_stats(budget: &Budget, locale: &LocaleContext) -> String {
    let goal = budget
        .stats
        .goal
        .map(|g| format!("{}%", g.normalize()))
        .unwrap_or_else(|| NOT_A_NUMBER.to_string());

    let mut output = String::new();
    output.push_str("Summary\n");
    output.push_str(&format!("  Available:     {}\n", locale.format(budget.stats.available)));
    output.push_str(&format!("  Goal:          {}\n", goal));
    output.push_str(&format!("  Saved:         {}\n", locale.format(budget.stats.saved)));
    output.push_str(&format!("  With goal:     {}\n", locale.format(budget.stats.with_goal)));
    output.push_str(&format!("  Reserves:      {}\n", locale.format(budget.stats.reserves)));
    output.push_str(&format!(
        "  Auto goal:     {}%\n",
        stats::auto_goal(budget).normalize()
    ));
    output.push_str(&format!(
        "  Median spend:  {}\n",
        locale.format(stats::median_expense(budget))
    ));

    output
}

/// Format a whole budget: header, both groups, and the summary
pub fn format_budget(budget: &Budget, locale: &LocaleContext) -> String {
    let percentages = stats::expense_percentages(budget);

    let mut output = String::new();
    output.push_str(&format!("Budget: {}\n", budget.name));
    output.push_str(&format!("  ID: {}\n\n", budget.id));
    output.push_str(&format_group(
        &budget.expenses,
        GroupKind::Expense,
        &percentages,
        locale,
    ));
    output.push('\n');
    output.push_str(&format_group(&budget.incomes, GroupKind::Income, &[], locale));
    output.push('\n');
    output.push_str(&format_stats(budget, locale));

    output
}

/// Format a list of budgets
pub fn format_budget_list(listings: &[BudgetListing]) -> String {
    if listings.is_empty() {
        return "No named budgets found.".to_string();
    }

    let name_width = listings
        .iter()
        .map(|l| l.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!("{:<width$}  {}\n", "Name", "ID", width = name_width));
    output.push_str(&format!("{:-<width$}  {:-<12}\n", "", "", width = name_width));

    for listing in listings {
        output.push_str(&format!(
            "{:<width$}  {}\n",
            listing.name,
            listing.id,
            width = name_width
        ));
    }

    output
}
