// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::store;
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let allocated = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;
    let percentage = sub
        .get_one::<String>("percent")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;

    store::insert_budget(conn, &month, &category, allocated, percentage)?;
    match (allocated, percentage) {
        (Some(a), _) => println!("Budget set for {} / {} = {}", month, category, a),
        (_, Some(p)) => println!("Budget set for {} / {} = {}% of income", month, category, p),
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").map(|s| s.trim());
    let data = store::list_budgets(conn, month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                vec![
                    b.month.clone(),
                    b.category.clone(),
                    b.allocated.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                    b.percentage.map(|p| format!("{}%", p)).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Category", "Allocated", "Income share"], rows)
        );
    }
    Ok(())
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;

    let budgets = store::list_budgets(conn, Some(&month))?;
    let transactions = store::month_transactions(conn, &month)?;
    let income = store::monthly_income(conn, &month)?;
    let views = ledger::budget_views(&budgets, &transactions, income);

    if !maybe_print_json(json_flag, jsonl_flag, &views)? {
        let rows: Vec<Vec<String>> = views
            .iter()
            .map(|v| {
                vec![
                    v.category.clone(),
                    format!("{:.2}", v.allocated),
                    format!("{:.2}", v.spent),
                    format!("{}%", v.utilization_percent),
                    if v.over_budget { "over".into() } else { String::new() },
                    v.color.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Allocated", "Spent", "Used", "", "Color"],
                rows
            )
        );
    }
    Ok(())
}
