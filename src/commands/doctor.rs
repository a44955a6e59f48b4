// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::GOAL_PREFIX;
use crate::utils::{parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Savings transactions addressing a goal that no longer exists
    let mut stmt = conn.prepare(
        "SELECT id, category FROM transactions WHERE kind='savings' AND category LIKE 'savings:goal:%' ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let tx_id: i64 = r.get(0)?;
        let category: String = r.get(1)?;
        let goal_id = category
            .strip_prefix(GOAL_PREFIX)
            .and_then(|s| s.parse::<i64>().ok());
        let exists = match goal_id {
            Some(gid) => {
                let mut st = conn.prepare("SELECT 1 FROM savings_goals WHERE id=?1")?;
                st.query_row([gid], |r| r.get::<_, i32>(0)).optional()?.is_some()
            }
            None => false,
        };
        if !exists {
            rows.push(vec!["orphaned_goal_ref".into(), format!("tx {} -> {}", tx_id, category)]);
        }
    }

    // 2) Months whose income-share budgets add up past 100%
    let mut stmt2 = conn.prepare(
        "SELECT month, percentage FROM budgets WHERE percentage IS NOT NULL ORDER BY month",
    )?;
    let mut cur2 = stmt2.query([])?;
    use std::collections::BTreeMap;
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    while let Some(r) = cur2.next()? {
        let month: String = r.get(0)?;
        let p_s: String = r.get(1)?;
        let p = parse_decimal(&p_s)
            .with_context(|| format!("Invalid budget percentage '{}' for {}", p_s, month))?;
        *months.entry(month).or_insert(Decimal::ZERO) += p;
    }
    for (month, total) in months {
        if total > Decimal::ONE_HUNDRED {
            rows.push(vec!["over_allocated_month".into(), format!("{} at {}%", month, total)]);
        }
    }

    // 3) Budgets with neither an amount nor a percentage (hand-edited rows)
    let mut stmt3 = conn.prepare(
        "SELECT month, category FROM budgets WHERE allocated IS NULL AND percentage IS NULL",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let month: String = r.get(0)?;
        let category: String = r.get(1)?;
        rows.push(vec!["unconfigured_budget".into(), format!("{} / {}", month, category)]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
