// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived-metrics layer: classification, budget utilization, goal
//! progress, and the monthly summary. Everything here is a pure
//! function over already-fetched records; persistence lives in `store`.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;

use crate::errors::LedgerError;
use crate::models::{
    Budget, BudgetView, FinancialSummary, GoalFrequency, GoalView, SavingsGoal, TimeRemaining,
    Transaction, TransactionKind,
};

pub const SAVINGS_PREFIX: &str = "savings:";
pub const GOAL_PREFIX: &str = "savings:goal:";

/// Canonical join key for categories. Idempotent and total: budgets are
/// stored display-cased, transactions however the user typed them, and
/// both sides meet here.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

/// The one category->style table. Namespaced categories are styled by
/// their first segment, so `savings:goal:3` renders like `savings`.
pub fn style(category: &str) -> CategoryStyle {
    let normalized = normalize(category);
    let head = normalized.split(':').next().unwrap_or("");
    let (color, icon) = match head {
        "shopping" => ("purple", "shopping-bag"),
        "food" => ("orange", "utensils"),
        "transport" => ("blue", "car"),
        "housing" => ("teal", "home"),
        "entertainment" => ("pink", "clapperboard"),
        "utilities" => ("gray", "plug"),
        "health" => ("red", "heart-pulse"),
        "education" => ("yellow", "book"),
        "subscription" => ("indigo", "repeat"),
        "savings" => ("green", "piggy-bank"),
        "salary" => ("green", "briefcase"),
        "coffee" => ("amber", "coffee"),
        "gifts" => ("pink", "gift"),
        "bills" => ("gray", "credit-card"),
        _ => ("gray", "tag"),
    };
    CategoryStyle { color, icon }
}

/// A classified transaction, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: TransactionKind,
    /// Signed for income/expense, absolute magnitude for savings.
    pub amount: Decimal,
    pub category: String,
    /// Set when the category addresses a specific goal.
    pub goal_id: Option<i64>,
}

/// Assign a transaction its kind from the signed amount and category
/// namespace. `savings:` wins over the sign; otherwise negative means
/// expense and everything else, zero included, is income.
pub fn classify(amount: Decimal, raw_category: &str) -> Result<Classified, LedgerError> {
    let category = normalize(raw_category);
    if category.starts_with(SAVINGS_PREFIX) {
        let goal_id = match category.strip_prefix(GOAL_PREFIX) {
            Some(rest) => Some(rest.parse::<i64>().map_err(|_| {
                LedgerError::validation(format!("invalid goal id in category '{}'", category))
            })?),
            None => None,
        };
        return Ok(Classified {
            kind: TransactionKind::Savings,
            amount: amount.abs(),
            category,
            goal_id,
        });
    }
    let kind = if amount < Decimal::ZERO {
        TransactionKind::Expense
    } else {
        TransactionKind::Income
    };
    Ok(Classified {
        kind,
        amount,
        category,
        goal_id: None,
    })
}

fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sum of expense magnitudes per (month, normalized category).
fn spending_by_category(transactions: &[Transaction]) -> HashMap<(String, String), Decimal> {
    let mut spending: HashMap<(String, String), Decimal> = HashMap::new();
    for t in transactions {
        if t.kind != TransactionKind::Expense {
            continue;
        }
        let key = (month_of(t.date), normalize(&t.category));
        *spending.entry(key).or_insert(Decimal::ZERO) += t.amount.abs();
    }
    spending
}

fn percent_of(part: Decimal, whole: Decimal) -> i64 {
    if whole <= Decimal::ZERO {
        return 0;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Join budgets against expense spending. Each budget's own month scopes
/// its window; percentage budgets resolve against `monthly_income` when
/// that income is positive and otherwise fall back to the stored amount
/// (zero when none was stored, the not-yet-configured case).
pub fn budget_views(
    budgets: &[Budget],
    transactions: &[Transaction],
    monthly_income: Decimal,
) -> Vec<BudgetView> {
    let spending = spending_by_category(transactions);
    budgets
        .iter()
        .map(|b| {
            let key = (b.month.clone(), normalize(&b.category));
            let spent = spending.get(&key).copied().unwrap_or(Decimal::ZERO);
            let allocated = match b.percentage {
                Some(p) if monthly_income > Decimal::ZERO => {
                    p / Decimal::ONE_HUNDRED * monthly_income
                }
                _ => b.allocated.unwrap_or(Decimal::ZERO),
            };
            let utilization_percent = percent_of(spent, allocated);
            BudgetView {
                id: b.id,
                month: b.month.clone(),
                category: b.category.clone(),
                allocated,
                spent,
                utilization_percent,
                over_budget: utilization_percent > 100,
                color: style(&b.category).color,
            }
        })
        .collect()
}

/// Percentage headroom left for a month before the 100% income-share
/// invariant would be violated.
pub fn percentage_room(budgets: &[Budget], month: &str) -> Decimal {
    let used: Decimal = budgets
        .iter()
        .filter(|b| b.month == month)
        .filter_map(|b| b.percentage)
        .sum();
    Decimal::ONE_HUNDRED - used
}

fn ceil_div(n: i64, d: i64) -> i64 {
    (n + d - 1) / d
}

fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// Time left until the goal's target date, floored at zero once due.
/// Weeks and months use fixed 7- and 30-day periods, not the calendar.
pub fn time_remaining(target_date: NaiveDate, today: NaiveDate) -> TimeRemaining {
    let diff = days_until(target_date, today);
    if diff <= 0 {
        return TimeRemaining {
            days: 0,
            weeks: 0,
            months: 0,
        };
    }
    TimeRemaining {
        days: diff,
        weeks: ceil_div(diff, 7),
        months: ceil_div(diff, 30),
    }
}

/// Derive a goal's progress figures. A zero target never divides: the
/// goal reads as 0% complete until it is actually configured.
pub fn goal_view(goal: &SavingsGoal, today: NaiveDate) -> GoalView {
    let progress = if goal.target_amount <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        (goal.current_amount / goal.target_amount * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
    };
    let remaining_amount = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
    GoalView {
        id: goal.id,
        name: goal.name.clone(),
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        progress,
        remaining_amount,
        time_remaining: time_remaining(goal.target_date, today),
        frequency: goal.frequency,
        target_contribution: goal.target_contribution,
    }
}

/// Periodic amount that would land the goal on time, used once as the
/// default `target_contribution` at creation. Zero for unscheduled or
/// already-due goals.
pub fn suggested_contribution(goal: &SavingsGoal, today: NaiveDate) -> Decimal {
    let remaining = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
    let tr = time_remaining(goal.target_date, today);
    let periods = match goal.frequency {
        GoalFrequency::Weekly => tr.weeks,
        GoalFrequency::Monthly => tr.months,
        GoalFrequency::None => 0,
    };
    if periods <= 0 {
        return Decimal::ZERO;
    }
    (remaining / Decimal::from(periods)).round_dp(2)
}

/// Reduce one month's transactions to the dashboard aggregate. Savings
/// is informational only; balance stays income minus expenses.
pub fn summary(transactions: &[Transaction], month: &str) -> FinancialSummary {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut savings = Decimal::ZERO;
    for t in transactions {
        if month_of(t.date) != month {
            continue;
        }
        match t.kind {
            TransactionKind::Income => income += t.amount,
            TransactionKind::Expense => expenses += t.amount.abs(),
            TransactionKind::Savings => savings += t.amount,
        }
    }
    FinancialSummary {
        month: month.to_string(),
        income,
        expenses,
        savings,
        balance: income - expenses,
    }
}
