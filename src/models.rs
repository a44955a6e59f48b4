// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Savings,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
            TransactionKind::Savings => "savings",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            "savings" => Ok(TransactionKind::Savings),
            other => Err(LedgerError::validation(format!(
                "unknown transaction kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub kind: TransactionKind,
    pub receipt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub month: String, // YYYY-MM
    pub category: String,
    pub allocated: Option<Decimal>,
    pub percentage: Option<Decimal>, // share of monthly income, 0-100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalFrequency {
    Weekly,
    Monthly,
    None,
}

impl GoalFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalFrequency::Weekly => "weekly",
            GoalFrequency::Monthly => "monthly",
            GoalFrequency::None => "none",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "weekly" => Ok(GoalFrequency::Weekly),
            "monthly" => Ok(GoalFrequency::Monthly),
            "none" => Ok(GoalFrequency::None),
            other => Err(LedgerError::validation(format!(
                "unknown frequency '{}' (use weekly|monthly|none)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: NaiveDate,
    pub frequency: GoalFrequency,
    pub target_contribution: Option<Decimal>,
}

/// A budget joined against the month's spending.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetView {
    pub id: i64,
    pub month: String,
    pub category: String,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub utilization_percent: i64,
    pub over_budget: bool,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub weeks: i64,
    pub months: i64,
}

/// A savings goal with its derived progress figures.
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub progress: Decimal, // percent, capped at 100
    pub remaining_amount: Decimal,
    pub time_remaining: TimeRemaining,
    pub frequency: GoalFrequency,
    pub target_contribution: Option<Decimal>,
}

/// Recomputed on every query, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
    pub balance: Decimal,
}
