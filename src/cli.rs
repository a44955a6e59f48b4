// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .required(required)
        .help("Month as YYYY-MM")
}

pub fn build_cli() -> Command {
    Command::new("billfold")
        .about("Personal budgeting, savings goals, and spending insights")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database if it does not exist"))
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction (negative amount = expense)")
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Signed amount; savings:* categories store the magnitude"),
                        )
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("Category name, or savings:<kind> / savings:goal:<id>"),
                        )
                        .arg(
                            Arg::new("receipt")
                                .long("receipt")
                                .help("Reference to an uploaded receipt"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit a transaction; amount/category re-classify")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(month_arg(false))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .help("expense|income|savings"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Define and inspect monthly budgets")
                .subcommand(
                    Command::new("set")
                        .about("Create a budget for a (month, category)")
                        .arg(month_arg(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Absolute monthly ceiling"),
                        )
                        .arg(
                            Arg::new("percent")
                                .long("percent")
                                .help("Share of the month's income, 0-100"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List budget definitions")
                        .arg(month_arg(false)),
                ))
                .subcommand(json_flags(
                    Command::new("report")
                        .about("Spent vs allocated per category for a month")
                        .arg(month_arg(true)),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals and contributions")
                .subcommand(
                    Command::new("add")
                        .about("Create a savings goal")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("target")
                                .long("target")
                                .required(true)
                                .help("Target amount"),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .default_value("0")
                                .help("Starting amount"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("Target date, YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .default_value("monthly")
                                .help("weekly|monthly|none"),
                        )
                        .arg(
                            Arg::new("contribution")
                                .long("contribution")
                                .help("Planned periodic contribution (defaults to the suggestion)"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List goals with progress"),
                ))
                .subcommand(
                    Command::new("contribute")
                        .about("Record a contribution toward a goal")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a goal")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(json_flags(
            Command::new("summary")
                .about("Income, expenses, savings, and balance for a month")
                .arg(month_arg(false)),
        ))
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export all transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistencies"))
        .subcommand(
            Command::new("config")
                .about("Display settings")
                .subcommand(
                    Command::new("set-currency")
                        .about("Set the display currency code")
                        .arg(Arg::new("code").long("code").required(true)),
                )
                .subcommand(Command::new("show").about("Show current settings")),
        )
}
