// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_currency, set_currency};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            set_currency(conn, &code)?;
            println!("Display currency set to {}", code);
        }
        Some(("show", _)) => {
            println!("currency = {}", get_currency(conn)?);
        }
        _ => {}
    }
    Ok(())
}
