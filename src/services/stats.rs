//! Statistics engine
//!
//! Pure functions that derive a budget's figures. All intermediate math is
//! done in [`Decimal`]; results are rounded half away from zero to the
//! precision each figure uses (cents for money, five places for the
//! auto-goal percentage).
//!
//! Missing values never raise errors here. An item without a number counts
//! as zero and a missing goal yields zero, so half-typed input still
//! produces figures. The only hard failure is an unknown operation name
//! passed to [`apply_operation`].

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, LineItem};

/// Decimal places used for money figures
pub const MONEY_PRECISION: u32 = 2;

/// Decimal places used for the auto-computed goal percentage
pub const AUTO_GOAL_PRECISION: u32 = 5;

/// An arithmetic step applied to a single amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
        }
    }

    /// Apply to `current`; `None` on overflow or division by zero
    pub fn apply(&self, current: Decimal, delta: Decimal) -> Option<Decimal> {
        match self {
            Operation::Add => current.checked_add(delta),
            Operation::Sub => current.checked_sub(delta),
            Operation::Mul => current.checked_mul(delta),
            Operation::Div => current.checked_div(delta),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "sub" => Ok(Operation::Sub),
            "mul" => Ok(Operation::Mul),
            "div" => Ok(Operation::Div),
            other => Err(BudgetError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Sum of the numeric item values; items without a number are skipped
///
/// Saturates at the bounds of [`Decimal`] instead of overflowing.
pub fn sum(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .filter_map(|item| item.value)
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

/// Round half away from zero to `precision` decimal places
pub fn round(value: Decimal, precision: u32) -> Decimal {
    value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
}

/// `part` as a percentage of `whole`
///
/// Results of at least 1% are rounded to whole percents, smaller ones keep
/// one decimal so a small share does not show up as 0%. Returns zero when
/// either side is missing or `whole` is not positive.
pub fn percentage(part: Option<Decimal>, whole: Option<Decimal>) -> Decimal {
    match (part, whole) {
        (Some(part), Some(whole)) if whole > Decimal::ZERO => {
            let Some(pct) = part
                .checked_mul(Decimal::ONE_HUNDRED)
                .and_then(|scaled| scaled.checked_div(whole))
            else {
                return Decimal::ZERO;
            };
            let precision = if pct >= Decimal::ONE { 0 } else { 1 };
            round(pct, precision)
        }
        _ => Decimal::ZERO,
    }
}

/// Apply the operation named `op` to `current`
///
/// The step only runs when `current` is a number and `delta` is strictly
/// positive; otherwise the result is zero. The result is rounded to cents
/// and never goes below zero.
pub fn apply_operation(
    current: Option<Decimal>,
    delta: Option<Decimal>,
    op: &str,
) -> BudgetResult<Decimal> {
    let operation: Operation = op.parse()?;

    let (Some(current), Some(delta)) = (current, delta) else {
        return Ok(Decimal::ZERO);
    };
    if delta <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let result = operation.apply(current, delta).ok_or_else(|| {
        BudgetError::InvalidNumber(format!("{} {} {} is out of range", current, operation, delta))
    })?;

    Ok(round(result, MONEY_PRECISION).max(Decimal::ZERO))
}

/// Income total minus expense total, unrounded; zero without a budget
pub fn available(budget: Option<&Budget>) -> Decimal {
    match budget {
        Some(budget) => sum(&budget.incomes.items).saturating_sub(sum(&budget.expenses.items)),
        None => Decimal::ZERO,
    }
}

/// Goal share of the income total, or `None` without a goal
fn goal_share(budget: &Budget) -> Option<Decimal> {
    let goal = budget.stats.goal?;
    Some(goal.saturating_mul(sum(&budget.incomes.items)) / Decimal::ONE_HUNDRED)
}

/// Available funds after setting aside the goal percentage of income
pub fn with_goal(budget: &Budget) -> Decimal {
    match goal_share(budget) {
        Some(share) => round(available(Some(budget)).saturating_sub(share), MONEY_PRECISION),
        None => Decimal::ZERO,
    }
}

/// The amount the goal sets aside: goal percentage of the income total
///
/// This is based on income, not on available funds.
pub fn saved(budget: &Budget) -> Decimal {
    match goal_share(budget) {
        Some(share) => round(share, MONEY_PRECISION),
        None => Decimal::ZERO,
    }
}

/// The goal percentage that would use up exactly the available funds
///
/// Zero unless a goal is set and both the income total and available funds
/// are positive.
pub fn auto_goal(budget: &Budget) -> Decimal {
    if budget.stats.goal.is_none() {
        return Decimal::ZERO;
    }

    let income_total = sum(&budget.incomes.items);
    let available = available(Some(budget));

    if income_total > Decimal::ZERO && available > Decimal::ZERO {
        available
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(income_total))
            .map_or(Decimal::ZERO, |pct| round(pct, AUTO_GOAL_PRECISION))
    } else {
        Decimal::ZERO
    }
}

/// Median of `values`; zero for an empty slice
pub fn median(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }

    let mut sorted = values.to_vec();
    sorted.sort();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        match low.checked_add(high) {
            Some(total) => total / Decimal::TWO,
            // same sign and near the bounds: halve first
            None => (low / Decimal::TWO).saturating_add(high / Decimal::TWO),
        }
    } else {
        sorted[mid]
    }
}

/// Refresh every derived figure on `budget`
///
/// Group totals and available funds are stored rounded to cents.
pub fn recompute(budget: &mut Budget) {
    budget.expenses.total = round(sum(&budget.expenses.items), MONEY_PRECISION);
    budget.incomes.total = round(sum(&budget.incomes.items), MONEY_PRECISION);
    budget.stats.available = round(available(Some(&*budget)), MONEY_PRECISION);
    budget.stats.with_goal = with_goal(budget);
    budget.stats.saved = saved(budget);

    tracing::debug!(
        budget = %budget.id,
        available = %budget.stats.available,
        with_goal = %budget.stats.with_goal,
        saved = %budget.stats.saved,
        "recomputed budget stats"
    );
}

/// Each expense's share of the income total, keyed by item id
pub fn expense_percentages(budget: &Budget) -> Vec<(i64, Decimal)> {
    let income_total = sum(&budget.incomes.items);
    budget
        .expenses
        .items
        .iter()
        .map(|item| (item.id, percentage(item.value, Some(income_total))))
        .collect()
}

/// Median of the numeric expense values
pub fn median_expense(budget: &Budget) -> Decimal {
    let values: Vec<Decimal> = budget.expenses.items.iter().filter_map(|i| i.value).collect();
    median(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItemGroup;
    use rust_decimal_macros::dec;

    fn budget_with(expenses: &[Decimal], incomes: &[Decimal], goal: Option<Decimal>) -> Budget {
        let to_items = |values: &[Decimal]| {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| LineItem::new(i as i64, format!("item {}", i), *v))
                .collect::<Vec<_>>()
        };

        let mut budget = Budget::empty("test");
        budget.expenses = LineItemGroup::from_items(to_items(expenses));
        budget.incomes = LineItemGroup::from_items(to_items(incomes));
        budget.stats.goal = goal;
        budget
    }

    #[test]
    fn test_sum_skips_missing_values() {
        let items = vec![
            LineItem::new(0, "a", dec!(10.10)),
            LineItem::with_value(1, "b", None),
            LineItem::new(2, "c", dec!(0.2)),
        ];
        assert_eq!(sum(&items), dec!(10.30));
        assert_eq!(sum(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_sum_is_order_invariant() {
        let mut items = vec![
            LineItem::new(0, "a", dec!(0.1)),
            LineItem::new(1, "b", dec!(0.2)),
            LineItem::with_value(2, "c", None),
            LineItem::new(3, "d", dec!(-3.33)),
        ];
        let forward = sum(&items);
        items.reverse();
        assert_eq!(sum(&items), forward);
        items.rotate_left(1);
        assert_eq!(sum(&items), forward);
    }

    #[test]
    fn test_decimal_sum_has_no_float_drift() {
        let items = vec![LineItem::new(0, "a", dec!(0.1)), LineItem::new(1, "b", dec!(0.2))];
        assert_eq!(sum(&items), dec!(0.3));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round(dec!(2.675), 2), dec!(2.68));
        assert_eq!(round(dec!(-2.675), 2), dec!(-2.68));
        assert_eq!(round(dec!(2.674), 2), dec!(2.67));
        assert_eq!(round(dec!(0.5), 0), dec!(1));
    }

    #[test]
    fn test_round_is_idempotent() {
        for x in [dec!(1.005), dec!(-7.125), dec!(33.3333), dec!(0), dec!(99.995)] {
            let once = round(x, 2);
            assert_eq!(round(once, 2), once);
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(Some(dec!(0)), Some(dec!(100))), dec!(0));
        assert_eq!(percentage(Some(dec!(50)), Some(dec!(100))), dec!(50));
        assert_eq!(percentage(Some(dec!(0.4)), Some(dec!(100))), dec!(0.4));
        assert_eq!(percentage(Some(dec!(5)), Some(dec!(0))), dec!(0));
        assert_eq!(percentage(Some(dec!(1)), Some(dec!(3))), dec!(33));
        assert_eq!(percentage(None, Some(dec!(100))), dec!(0));
        assert_eq!(percentage(Some(dec!(5)), None), dec!(0));
        assert_eq!(percentage(Some(dec!(5)), Some(dec!(-10))), dec!(0));
    }

    #[test]
    fn test_apply_operation() {
        assert_eq!(apply_operation(Some(dec!(10)), Some(dec!(3)), "add").unwrap(), dec!(13));
        assert_eq!(apply_operation(Some(dec!(10)), Some(dec!(3)), "sub").unwrap(), dec!(7));
        assert_eq!(apply_operation(Some(dec!(10)), Some(dec!(3)), "mul").unwrap(), dec!(30));
        assert_eq!(apply_operation(Some(dec!(10)), Some(dec!(3)), "div").unwrap(), dec!(3.33));
    }

    #[test]
    fn test_apply_operation_clamps_at_zero() {
        assert_eq!(apply_operation(Some(dec!(5)), Some(dec!(10)), "sub").unwrap(), dec!(0));
    }

    #[test]
    fn test_apply_operation_guards() {
        assert_eq!(apply_operation(None, Some(dec!(3)), "add").unwrap(), dec!(0));
        assert_eq!(apply_operation(Some(dec!(10)), Some(dec!(0)), "add").unwrap(), dec!(0));
        assert_eq!(apply_operation(Some(dec!(10)), Some(dec!(-1)), "add").unwrap(), dec!(0));
        assert_eq!(apply_operation(Some(dec!(10)), None, "add").unwrap(), dec!(0));
    }

    #[test]
    fn test_apply_operation_unknown() {
        let err = apply_operation(Some(dec!(10)), Some(dec!(3)), "bogus").unwrap_err();
        assert!(err.is_unsupported_operation());
    }

    #[test]
    fn test_available() {
        let budget = budget_with(&[dec!(100), dec!(50.5)], &[dec!(1000)], Some(dec!(10)));
        assert_eq!(available(Some(&budget)), dec!(849.5));
        assert_eq!(
            available(Some(&budget)),
            sum(&budget.incomes.items) - sum(&budget.expenses.items)
        );
        assert_eq!(available(None), Decimal::ZERO);
    }

    #[test]
    fn test_with_goal_and_saved() {
        let budget = budget_with(&[dec!(1000)], &[dec!(3000)], Some(dec!(10)));
        assert_eq!(with_goal(&budget), dec!(1700));
        assert_eq!(saved(&budget), dec!(300));

        let no_goal = budget_with(&[dec!(1000)], &[dec!(3000)], None);
        assert_eq!(with_goal(&no_goal), Decimal::ZERO);
        assert_eq!(saved(&no_goal), Decimal::ZERO);
    }

    #[test]
    fn test_saved_uses_income_not_available() {
        let budget = budget_with(&[dec!(2900)], &[dec!(3000)], Some(dec!(50)));
        assert_eq!(saved(&budget), dec!(1500));
        assert_eq!(with_goal(&budget), dec!(-1400));
    }

    #[test]
    fn test_auto_goal() {
        let budget = budget_with(&[dec!(1000)], &[dec!(3000)], Some(dec!(10)));
        assert_eq!(auto_goal(&budget), dec!(66.66667));

        let overspent = budget_with(&[dec!(4000)], &[dec!(3000)], Some(dec!(10)));
        assert_eq!(auto_goal(&overspent), Decimal::ZERO);

        let no_income = budget_with(&[], &[], Some(dec!(10)));
        assert_eq!(auto_goal(&no_income), Decimal::ZERO);

        let no_goal = budget_with(&[dec!(1000)], &[dec!(3000)], None);
        assert_eq!(auto_goal(&no_goal), Decimal::ZERO);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), dec!(0));
        assert_eq!(median(&[dec!(1), dec!(2), dec!(3)]), dec!(2));
        assert_eq!(median(&[dec!(1), dec!(2), dec!(3), dec!(4)]), dec!(2.5));
        assert_eq!(median(&[dec!(3), dec!(1), dec!(2)]), dec!(2));
        assert_eq!(median(&[dec!(0.3), dec!(0.1)]), dec!(0.2));
    }

    #[test]
    fn test_recompute() {
        let mut budget = budget_with(&[dec!(10.005), dec!(20)], &[dec!(100)], Some(dec!(10)));
        budget.expenses.items.push(LineItem::with_value(9, "broken", None));
        recompute(&mut budget);

        assert_eq!(budget.expenses.total, dec!(30.01));
        assert_eq!(budget.incomes.total, dec!(100));
        // derived from the unrounded sums: 100 - 30.005
        assert_eq!(budget.stats.available, dec!(70));
        assert_eq!(budget.stats.with_goal, dec!(60));
        assert_eq!(budget.stats.saved, dec!(10));
    }

    #[test]
    fn test_recompute_keeps_inputs() {
        let mut budget = budget_with(&[dec!(1)], &[dec!(2)], Some(dec!(25)));
        budget.stats.reserves = dec!(500);
        recompute(&mut budget);

        assert_eq!(budget.stats.goal, Some(dec!(25)));
        assert_eq!(budget.stats.reserves, dec!(500));
    }

    #[test]
    fn test_expense_percentages() {
        let budget = budget_with(&[dec!(500), dec!(2)], &[dec!(1000)], Some(dec!(10)));
        assert_eq!(
            expense_percentages(&budget),
            vec![(0, dec!(50)), (1, dec!(0.2))]
        );
    }

    #[test]
    fn test_figures_saturate_near_decimal_bounds() {
        let mut budget = budget_with(
            &[Decimal::MIN, dec!(-1)],
            &[Decimal::MAX, dec!(1)],
            Some(dec!(10)),
        );

        assert_eq!(sum(&budget.expenses.items), Decimal::MIN);
        assert_eq!(sum(&budget.incomes.items), Decimal::MAX);
        assert_eq!(available(Some(&budget)), Decimal::MAX);
        assert!(with_goal(&budget) > Decimal::ZERO);
        assert!(saved(&budget) > Decimal::ZERO);
        assert!(median(&[Decimal::MAX, Decimal::MAX]) >= Decimal::MAX - dec!(1));

        recompute(&mut budget);
        assert_eq!(budget.incomes.total, Decimal::MAX);
        assert_eq!(budget.stats.available, Decimal::MAX);
    }

    #[test]
    fn test_median_expense() {
        let mut budget = budget_with(&[dec!(30), dec!(10)], &[], Some(dec!(10)));
        budget.expenses.items.push(LineItem::with_value(5, "x", None));
        assert_eq!(median_expense(&budget), dec!(20));
    }
}
