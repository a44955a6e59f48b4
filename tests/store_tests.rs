// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::errors::LedgerError;
use billfold::ledger;
use billfold::models::{GoalFrequency, TransactionKind};
use billfold::store::{self, TransactionFilter};
use billfold::{cli, commands::transactions};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            amount TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('expense','income','savings')),
            receipt TEXT
        );
        CREATE TABLE budgets(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            month TEXT NOT NULL,
            category TEXT NOT NULL,
            allocated TEXT,
            percentage TEXT,
            UNIQUE(month, category)
        );
        CREATE TABLE savings_goals(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            target_amount TEXT NOT NULL,
            current_amount TEXT NOT NULL DEFAULT '0',
            target_date TEXT NOT NULL,
            frequency TEXT NOT NULL,
            target_contribution TEXT
        );
        "#,
    )
    .unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn contribution_updates_goal_and_records_transaction_together() {
    let mut conn = setup();
    let today = d(2025, 8, 5);
    let goal_id = store::insert_goal(
        &conn,
        "Vacation",
        Decimal::from(10000),
        Decimal::from(4000),
        d(2025, 10, 4),
        GoalFrequency::Monthly,
        None,
        today,
    )
    .unwrap();

    let recorded = store::record_transaction(
        &mut conn,
        d(2025, 8, 10),
        Decimal::from(250),
        "Payday stash",
        &format!("savings:goal:{}", goal_id),
        None,
    )
    .unwrap();
    assert_eq!(recorded.kind, TransactionKind::Savings);

    let goal = store::get_goal(&conn, goal_id).unwrap();
    assert_eq!(goal.current_amount, Decimal::from(4250));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions WHERE kind='savings'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn contribution_to_missing_goal_rolls_back_the_insert() {
    let mut conn = setup();
    let err = store::record_transaction(
        &mut conn,
        d(2025, 8, 10),
        Decimal::from(250),
        "Stash",
        "savings:goal:99",
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn plain_savings_category_stores_the_magnitude() {
    let mut conn = setup();
    let recorded = store::record_transaction(
        &mut conn,
        d(2025, 8, 10),
        Decimal::from(-500),
        "Emergency fund",
        "savings:emergency",
        None,
    )
    .unwrap();
    assert_eq!(recorded.kind, TransactionKind::Savings);
    assert_eq!(recorded.amount, Decimal::from(500));

    let stored: String = conn
        .query_row("SELECT amount FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(stored, "500");
}

#[test]
fn over_contribution_is_stored_but_progress_caps_at_100() {
    let mut conn = setup();
    let today = d(2025, 8, 5);
    let goal_id = store::insert_goal(
        &conn,
        "New phone",
        Decimal::from(10000),
        Decimal::from(9500),
        d(2025, 12, 1),
        GoalFrequency::Monthly,
        None,
        today,
    )
    .unwrap();

    store::record_transaction(
        &mut conn,
        d(2025, 8, 10),
        Decimal::from(1000),
        "Final push",
        &format!("savings:goal:{}", goal_id),
        None,
    )
    .unwrap();

    let goal = store::get_goal(&conn, goal_id).unwrap();
    assert_eq!(goal.current_amount, Decimal::from(10500));
    let view = ledger::goal_view(&goal, today);
    assert_eq!(view.progress, Decimal::ONE_HUNDRED);
    assert_eq!(view.remaining_amount, Decimal::ZERO);
}

#[test]
fn goal_defaults_planned_contribution_to_the_suggestion() {
    let conn = setup();
    let today = d(2025, 8, 5);
    let goal_id = store::insert_goal(
        &conn,
        "Vacation",
        Decimal::from(10000),
        Decimal::from(4000),
        d(2025, 10, 4), // two 30-day months out
        GoalFrequency::Monthly,
        None,
        today,
    )
    .unwrap();
    let goal = store::get_goal(&conn, goal_id).unwrap();
    assert_eq!(goal.target_contribution, Some(Decimal::from(3000)));
}

#[test]
fn explicit_planned_contribution_wins_over_the_suggestion() {
    let conn = setup();
    let goal_id = store::insert_goal(
        &conn,
        "Vacation",
        Decimal::from(10000),
        Decimal::ZERO,
        d(2025, 10, 4),
        GoalFrequency::Monthly,
        Some(Decimal::from(1234)),
        d(2025, 8, 5),
    )
    .unwrap();
    let goal = store::get_goal(&conn, goal_id).unwrap();
    assert_eq!(goal.target_contribution, Some(Decimal::from(1234)));
}

#[test]
fn goal_creation_validates_target_and_date() {
    let conn = setup();
    let today = d(2025, 8, 5);
    assert!(store::insert_goal(
        &conn,
        "Past",
        Decimal::from(1000),
        Decimal::ZERO,
        d(2025, 6, 1),
        GoalFrequency::None,
        None,
        today,
    )
    .is_err());
    assert!(store::insert_goal(
        &conn,
        "Empty",
        Decimal::ZERO,
        Decimal::ZERO,
        d(2025, 12, 1),
        GoalFrequency::None,
        None,
        today,
    )
    .is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM savings_goals", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn deleting_a_missing_goal_is_not_found() {
    let conn = setup();
    let err = store::delete_goal(&conn, 7).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));
}

#[test]
fn list_transactions_filters_by_kind_and_month() {
    let mut conn = setup();
    store::record_transaction(&mut conn, d(2025, 8, 1), Decimal::from(3000), "Pay", "salary", None)
        .unwrap();
    store::record_transaction(&mut conn, d(2025, 8, 3), Decimal::from(-80), "Market", "food", None)
        .unwrap();
    store::record_transaction(&mut conn, d(2025, 7, 3), Decimal::from(-10), "Bus", "transport", None)
        .unwrap();

    let expenses = store::list_transactions(
        &conn,
        &TransactionFilter {
            month: Some("2025-08".to_string()),
            category: None,
            kind: Some(TransactionKind::Expense),
            limit: None,
        },
    )
    .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, "Market");
}

#[test]
fn editing_amount_or_category_reclassifies() {
    let mut conn = setup();
    let recorded = store::record_transaction(
        &mut conn,
        d(2025, 8, 3),
        Decimal::from(-80),
        "Market",
        "Food",
        None,
    )
    .unwrap();
    assert_eq!(recorded.kind, TransactionKind::Expense);

    // Flip the sign and the row becomes income; category re-normalizes.
    let updated = store::update_transaction(
        &conn,
        recorded.id,
        None,
        Some(Decimal::from(80)),
        None,
        Some(" Refunds "),
    )
    .unwrap();
    assert_eq!(updated.kind, TransactionKind::Income);
    assert_eq!(updated.category, "refunds");

    let kind: String = conn
        .query_row("SELECT kind FROM transactions WHERE id=?1", [recorded.id], |r| r.get(0))
        .unwrap();
    assert_eq!(kind, "income");
}

#[test]
fn goal_contributions_cannot_be_edited_or_targeted() {
    let mut conn = setup();
    let goal_id = store::insert_goal(
        &conn,
        "Vacation",
        Decimal::from(1000),
        Decimal::ZERO,
        d(2025, 12, 1),
        GoalFrequency::None,
        None,
        d(2025, 8, 5),
    )
    .unwrap();
    let contribution = store::record_transaction(
        &mut conn,
        d(2025, 8, 10),
        Decimal::from(100),
        "Stash",
        &format!("savings:goal:{}", goal_id),
        None,
    )
    .unwrap();
    let plain = store::record_transaction(
        &mut conn,
        d(2025, 8, 11),
        Decimal::from(-20),
        "Bus",
        "transport",
        None,
    )
    .unwrap();

    // Neither editing a contribution nor retargeting into a goal is allowed.
    assert!(store::update_transaction(
        &conn,
        contribution.id,
        None,
        Some(Decimal::from(200)),
        None,
        None
    )
    .is_err());
    assert!(store::update_transaction(
        &conn,
        plain.id,
        None,
        None,
        None,
        Some(&format!("savings:goal:{}", goal_id))
    )
    .is_err());

    let goal = store::get_goal(&conn, goal_id).unwrap();
    assert_eq!(goal.current_amount, Decimal::from(100));
}

#[test]
fn tx_add_trims_inputs() {
    let mut conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "billfold",
        "tx",
        "add",
        "--date",
        " 2025-08-10 ",
        "--amount",
        " -42.50 ",
        "--description",
        "Corner shop",
        "--category",
        " Food ",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&mut conn, tx_m).unwrap();
    } else {
        panic!("tx command not parsed");
    }

    let (amount, category, kind): (String, String, String) = conn
        .query_row("SELECT amount, category, kind FROM transactions", [], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?))
        })
        .unwrap();
    assert_eq!(amount, "-42.50");
    assert_eq!(category, "food");
    assert_eq!(kind, "expense");
}
