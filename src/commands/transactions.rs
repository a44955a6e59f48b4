// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionKind;
use crate::store::{self, TransactionFilter};
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap().trim())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let description = sub.get_one::<String>("description").unwrap();
    let category = sub.get_one::<String>("category").unwrap();
    let receipt = sub.get_one::<String>("receipt").map(|s| s.as_str());

    let recorded = store::record_transaction(conn, date, amount, description, category, receipt)?;
    let ccy = get_currency(conn)?;
    println!(
        "Recorded {} {} on {} '{}' ({})",
        recorded.kind.as_str(),
        fmt_money(&recorded.amount, &ccy),
        recorded.date,
        recorded.description,
        recorded.category
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;
    let description = sub.get_one::<String>("description").map(|s| s.as_str());
    let category = sub.get_one::<String>("category").map(|s| s.as_str());

    let updated = store::update_transaction(conn, id, date, amount, description, category)?;
    println!(
        "Updated #{}: {} {} '{}' ({})",
        updated.id,
        updated.kind.as_str(),
        updated.amount,
        updated.description,
        updated.category
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let kind = sub
        .get_one::<String>("kind")
        .map(|s| TransactionKind::parse(s.trim()))
        .transpose()?;
    let filter = TransactionFilter {
        month: sub.get_one::<String>("month").map(|s| s.trim().to_string()),
        category: sub.get_one::<String>("category").cloned(),
        kind,
        limit: sub.get_one::<usize>("limit").copied(),
    };

    let data = store::list_transactions(conn, &filter)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.description.clone(),
                    format!("{:.2}", t.amount),
                    t.category.clone(),
                    t.kind.as_str().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Amount", "Category", "Kind"], rows)
        );
    }
    Ok(())
}
