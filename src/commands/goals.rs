// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, GOAL_PREFIX};
use crate::models::{GoalFrequency, GoalView};
use crate::store;
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap().trim())?;
    let start = parse_decimal(sub.get_one::<String>("start").unwrap().trim())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap().trim())?;
    let frequency = GoalFrequency::parse(sub.get_one::<String>("frequency").unwrap().trim())?;
    let contribution = sub
        .get_one::<String>("contribution")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;

    let id = store::insert_goal(conn, &name, target, start, date, frequency, contribution, today())?;
    let goal = store::get_goal(conn, id)?;
    let ccy = get_currency(conn)?;
    println!("Created goal '{}' (#{}) due {}", goal.name, goal.id, goal.target_date);
    if let Some(c) = goal.target_contribution {
        println!(
            "Planned contribution: {} {}",
            fmt_money(&c, &ccy),
            goal.frequency.as_str()
        );
    }
    Ok(())
}

fn time_left(v: &GoalView) -> String {
    match v.frequency {
        GoalFrequency::Weekly => format!("{} weeks left", v.time_remaining.weeks),
        GoalFrequency::Monthly => format!("{} months left", v.time_remaining.months),
        GoalFrequency::None => format!("{} days left", v.time_remaining.days),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let now = today();
    let views: Vec<GoalView> = store::list_goals(conn)?
        .iter()
        .map(|g| ledger::goal_view(g, now))
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &views)? {
        let rows: Vec<Vec<String>> = views
            .iter()
            .map(|v| {
                vec![
                    v.id.to_string(),
                    v.name.clone(),
                    format!("{:.2}", v.current_amount),
                    format!("{:.2}", v.target_amount),
                    format!("{:.0}%", v.progress.round_dp(0)),
                    format!("{:.2}", v.remaining_amount),
                    time_left(v),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Goal", "Saved", "Target", "Progress", "Remaining", "Due"],
                rows
            )
        );
    }
    Ok(())
}

fn contribute(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s.trim())?,
        None => today(),
    };

    // Resolve the goal first so the default description can name it.
    let goal = store::get_goal(conn, id)?;
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or_else(|| format!("Contribution to {}", goal.name));

    let category = format!("{}{}", GOAL_PREFIX, id);
    store::record_transaction(conn, date, amount, &description, &category, None)?;

    let updated = store::get_goal(conn, id)?;
    let ccy = get_currency(conn)?;
    println!(
        "Goal '{}' now at {} of {}",
        updated.name,
        fmt_money(&updated.current_amount, &ccy),
        fmt_money(&updated.target_amount, &ccy)
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    store::delete_goal(conn, id)?;
    println!("Removed goal #{}", id);
    Ok(())
}
