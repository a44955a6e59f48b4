// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::store;
use crate::utils::{current_month, fmt_money, get_currency, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let month = match m.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => current_month(),
    };

    let transactions = store::month_transactions(conn, &month)?;
    let summary = ledger::summary(&transactions, &month);

    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        let ccy = get_currency(conn)?;
        let rows = vec![
            vec!["Income".to_string(), fmt_money(&summary.income, &ccy)],
            vec!["Expenses".to_string(), fmt_money(&summary.expenses, &ccy)],
            vec![
                "Savings (informational)".to_string(),
                fmt_money(&summary.savings, &ccy),
            ],
            vec!["Balance".to_string(), fmt_money(&summary.balance, &ccy)],
        ];
        println!("{}", pretty_table(&[month.as_str(), ""], rows));
    }
    Ok(())
}
