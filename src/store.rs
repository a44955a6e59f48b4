// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage boundary over SQLite. Reads hand back complete snapshots for
//! the ledger functions; writes validate first and never partially
//! apply.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::errors::LedgerError;
use crate::ledger;
use crate::models::{Budget, GoalFrequency, SavingsGoal, Transaction, TransactionKind};
use crate::utils::{parse_date, parse_decimal};

fn transaction_from_row(r: &rusqlite::Row<'_>) -> Result<Transaction> {
    let date_s: String = r.get(1)?;
    let amount_s: String = r.get(2)?;
    let kind_s: String = r.get(5)?;
    Ok(Transaction {
        id: r.get(0)?,
        date: parse_date(&date_s)?,
        amount: parse_decimal(&amount_s)
            .with_context(|| format!("Invalid amount '{}' in transactions", amount_s))?,
        description: r.get(3)?,
        category: r.get(4)?,
        kind: TransactionKind::parse(&kind_s)?,
        receipt: r.get(6)?,
    })
}

const TX_COLS: &str = "id, date, amount, description, category, kind, receipt";

pub struct TransactionFilter {
    pub month: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<usize>,
}

pub fn list_transactions(conn: &Connection, f: &TransactionFilter) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", TX_COLS);
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(ref month) = f.month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.clone());
    }
    if let Some(ref cat) = f.category {
        sql.push_str(" AND category=?");
        params_vec.push(ledger::normalize(cat));
    }
    if let Some(kind) = f.kind {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = f.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(transaction_from_row(r)?);
    }
    Ok(data)
}

pub fn month_transactions(conn: &Connection, month: &str) -> Result<Vec<Transaction>> {
    list_transactions(
        conn,
        &TransactionFilter {
            month: Some(month.to_string()),
            category: None,
            kind: None,
            limit: None,
        },
    )
}

/// Sum of income-kind amounts for a month; the denominator for
/// percentage-of-income budgets.
pub fn monthly_income(conn: &Connection, month: &str) -> Result<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT amount FROM transactions WHERE kind='income' AND substr(date,1,7)=?1",
    )?;
    let mut rows = stmt.query(params![month])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += parse_decimal(&s)
            .with_context(|| format!("Invalid amount '{}' in transactions", s))?;
    }
    Ok(total)
}

/// Classify and persist one transaction. A goal-addressed contribution
/// updates the goal and inserts the row in one write transaction, so a
/// reader who sees the transaction also sees the funded goal, and a
/// missing goal aborts the insert entirely.
pub fn record_transaction(
    conn: &mut Connection,
    date: NaiveDate,
    amount: Decimal,
    description: &str,
    raw_category: &str,
    receipt: Option<&str>,
) -> Result<Transaction> {
    let classified = ledger::classify(amount, raw_category)?;

    let tx = conn.transaction()?;
    if let Some(goal_id) = classified.goal_id {
        increment_goal(&tx, goal_id, classified.amount)?;
    }
    tx.execute(
        "INSERT INTO transactions(date, amount, description, category, kind, receipt)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            date.to_string(),
            classified.amount.to_string(),
            description,
            classified.category,
            classified.kind.as_str(),
            receipt
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Transaction {
        id,
        date,
        amount: classified.amount,
        description: description.to_string(),
        category: classified.category,
        kind: classified.kind,
        receipt: receipt.map(|s| s.to_string()),
    })
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions WHERE id=?1",
        TX_COLS
    ))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => transaction_from_row(r),
        None => Err(LedgerError::not_found(format!("transaction {}", id)).into()),
    }
}

/// Edit a recorded transaction. Any field may change, and a changed
/// amount or category goes back through the classifier. Goal-linked
/// contributions are refused on both sides of the edit: their totals
/// live on the goal row, so the correction path is an adjusting
/// transaction, not a rewrite.
pub fn update_transaction(
    conn: &Connection,
    id: i64,
    date: Option<NaiveDate>,
    amount: Option<Decimal>,
    description: Option<&str>,
    raw_category: Option<&str>,
) -> Result<Transaction> {
    let existing = get_transaction(conn, id)?;
    if existing.category.starts_with(ledger::GOAL_PREFIX) {
        return Err(LedgerError::validation(format!(
            "transaction {} funds a goal; record an adjusting transaction instead",
            id
        ))
        .into());
    }

    let classified = ledger::classify(
        amount.unwrap_or(existing.amount),
        raw_category.unwrap_or(&existing.category),
    )?;
    if classified.goal_id.is_some() {
        return Err(LedgerError::validation(
            "cannot retarget a transaction into a goal; use goal contribute",
        )
        .into());
    }

    let date = date.unwrap_or(existing.date);
    let description = description.unwrap_or(&existing.description);
    conn.execute(
        "UPDATE transactions SET date=?1, amount=?2, description=?3, category=?4, kind=?5 WHERE id=?6",
        params![
            date.to_string(),
            classified.amount.to_string(),
            description,
            classified.category,
            classified.kind.as_str(),
            id
        ],
    )?;

    Ok(Transaction {
        id,
        date,
        amount: classified.amount,
        description: description.to_string(),
        category: classified.category,
        kind: classified.kind,
        receipt: existing.receipt,
    })
}

/// Add `amount` to a goal's running total. Callers hold a write
/// transaction, which serializes concurrent contributions at the
/// storage engine rather than in application code.
pub fn increment_goal(conn: &Connection, goal_id: i64, amount: Decimal) -> Result<Decimal> {
    let current_s: Option<String> = conn
        .query_row(
            "SELECT current_amount FROM savings_goals WHERE id=?1",
            params![goal_id],
            |r| r.get(0),
        )
        .optional()?;
    let current_s =
        current_s.ok_or_else(|| LedgerError::not_found(format!("savings goal {}", goal_id)))?;
    let current = parse_decimal(&current_s)
        .with_context(|| format!("Invalid current_amount '{}' for goal {}", current_s, goal_id))?;
    let updated = current + amount;
    conn.execute(
        "UPDATE savings_goals SET current_amount=?1 WHERE id=?2",
        params![updated.to_string(), goal_id],
    )?;
    Ok(updated)
}

fn budget_from_row(r: &rusqlite::Row<'_>) -> Result<Budget> {
    let allocated_s: Option<String> = r.get(3)?;
    let percentage_s: Option<String> = r.get(4)?;
    Ok(Budget {
        id: r.get(0)?,
        month: r.get(1)?,
        category: r.get(2)?,
        allocated: allocated_s
            .map(|s| {
                parse_decimal(&s).with_context(|| format!("Invalid budget amount '{}'", s))
            })
            .transpose()?,
        percentage: percentage_s
            .map(|s| {
                parse_decimal(&s).with_context(|| format!("Invalid budget percentage '{}'", s))
            })
            .transpose()?,
    })
}

pub fn list_budgets(conn: &Connection, month: Option<&str>) -> Result<Vec<Budget>> {
    let mut data = Vec::new();
    if let Some(month) = month {
        let mut stmt = conn.prepare(
            "SELECT id, month, category, allocated, percentage FROM budgets
             WHERE month=?1 ORDER BY category",
        )?;
        let mut rows = stmt.query(params![month])?;
        while let Some(r) = rows.next()? {
            data.push(budget_from_row(r)?);
        }
    } else {
        let mut stmt = conn.prepare(
            "SELECT id, month, category, allocated, percentage FROM budgets
             ORDER BY month DESC, category",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            data.push(budget_from_row(r)?);
        }
    }
    Ok(data)
}

/// Create a budget for (month, category). Exactly one of amount or
/// percentage; a percentage must leave the month's income-share sum at
/// or under 100. Nothing is written when validation fails.
pub fn insert_budget(
    conn: &Connection,
    month: &str,
    category: &str,
    allocated: Option<Decimal>,
    percentage: Option<Decimal>,
) -> Result<i64> {
    match (allocated, percentage) {
        (Some(_), Some(_)) | (None, None) => {
            return Err(
                LedgerError::validation("budget takes an amount or a percentage, not both").into(),
            );
        }
        (Some(a), None) if a <= Decimal::ZERO => {
            return Err(LedgerError::validation("budget amount must be positive").into());
        }
        (None, Some(p)) => {
            if p <= Decimal::ZERO || p > Decimal::ONE_HUNDRED {
                return Err(
                    LedgerError::validation("budget percentage must be in (0, 100]").into(),
                );
            }
            let existing = list_budgets(conn, Some(month))?;
            let room = ledger::percentage_room(&existing, month);
            if p > room {
                return Err(LedgerError::validation(format!(
                    "income-share budgets for {} would exceed 100% ({}% remaining)",
                    month, room
                ))
                .into());
            }
        }
        _ => {}
    }

    conn.execute(
        "INSERT INTO budgets(month, category, allocated, percentage) VALUES (?1,?2,?3,?4)",
        params![
            month,
            category,
            allocated.map(|d| d.to_string()),
            percentage.map(|d| d.to_string())
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn goal_from_row(r: &rusqlite::Row<'_>) -> Result<SavingsGoal> {
    let target_s: String = r.get(2)?;
    let current_s: String = r.get(3)?;
    let date_s: String = r.get(4)?;
    let freq_s: String = r.get(5)?;
    let contrib_s: Option<String> = r.get(6)?;
    Ok(SavingsGoal {
        id: r.get(0)?,
        name: r.get(1)?,
        target_amount: parse_decimal(&target_s)
            .with_context(|| format!("Invalid target_amount '{}'", target_s))?,
        current_amount: parse_decimal(&current_s)
            .with_context(|| format!("Invalid current_amount '{}'", current_s))?,
        target_date: parse_date(&date_s)?,
        frequency: GoalFrequency::parse(&freq_s)?,
        target_contribution: contrib_s
            .map(|s| {
                parse_decimal(&s).with_context(|| format!("Invalid target_contribution '{}'", s))
            })
            .transpose()?,
    })
}

const GOAL_COLS: &str =
    "id, name, target_amount, current_amount, target_date, frequency, target_contribution";

pub fn list_goals(conn: &Connection) -> Result<Vec<SavingsGoal>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM savings_goals ORDER BY target_date, id",
        GOAL_COLS
    ))?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(goal_from_row(r)?);
    }
    Ok(data)
}

pub fn get_goal(conn: &Connection, id: i64) -> Result<SavingsGoal> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM savings_goals WHERE id=?1",
        GOAL_COLS
    ))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => goal_from_row(r),
        None => Err(LedgerError::not_found(format!("savings goal {}", id)).into()),
    }
}

/// Create a goal. Targets must be positive and dated in the future;
/// when no planned contribution is given, the suggested periodic
/// contribution for the cadence becomes the default.
pub fn insert_goal(
    conn: &Connection,
    name: &str,
    target_amount: Decimal,
    starting_amount: Decimal,
    target_date: NaiveDate,
    frequency: GoalFrequency,
    target_contribution: Option<Decimal>,
    today: NaiveDate,
) -> Result<i64> {
    if target_amount <= Decimal::ZERO {
        return Err(LedgerError::validation("target amount must be positive").into());
    }
    if starting_amount < Decimal::ZERO {
        return Err(LedgerError::validation("starting amount must be 0 or greater").into());
    }
    if target_date <= today {
        return Err(LedgerError::validation("target date must be in the future").into());
    }

    let contribution = match target_contribution {
        Some(c) => Some(c),
        None => {
            let draft = SavingsGoal {
                id: 0,
                name: name.to_string(),
                target_amount,
                current_amount: starting_amount,
                target_date,
                frequency,
                target_contribution: None,
            };
            let suggested = ledger::suggested_contribution(&draft, today);
            (suggested > Decimal::ZERO).then_some(suggested)
        }
    };

    conn.execute(
        "INSERT INTO savings_goals(name, target_amount, current_amount, target_date, frequency, target_contribution)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            name,
            target_amount.to_string(),
            starting_amount.to_string(),
            target_date.to_string(),
            frequency.as_str(),
            contribution.map(|d| d.to_string())
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_goal(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM savings_goals WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::not_found(format!("savings goal {}", id)).into());
    }
    Ok(())
}
