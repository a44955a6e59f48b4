// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::ledger::{budget_views, percentage_room};
use billfold::models::{Budget, Transaction, TransactionKind};
use billfold::store;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn expense(id: i64, date: NaiveDate, amount: i64, category: &str) -> Transaction {
    Transaction {
        id,
        date,
        amount: Decimal::from(amount),
        description: String::new(),
        category: category.to_string(),
        kind: TransactionKind::Expense,
        receipt: None,
    }
}

fn fixed_budget(id: i64, month: &str, category: &str, allocated: i64) -> Budget {
    Budget {
        id,
        month: month.to_string(),
        category: category.to_string(),
        allocated: Some(Decimal::from(allocated)),
        percentage: None,
    }
}

#[test]
fn spending_over_allocation_reports_110_percent() {
    let budgets = vec![fixed_budget(1, "2025-08", "Food", 500)];
    let txs = vec![
        expense(1, d(2025, 8, 3), -350, "food"),
        expense(2, d(2025, 8, 20), -200, "food"),
    ];
    let views = budget_views(&budgets, &txs, Decimal::ZERO);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].spent, Decimal::from(550));
    assert_eq!(views[0].utilization_percent, 110);
    assert!(views[0].over_budget);
}

#[test]
fn exactly_spent_is_not_over_budget() {
    let budgets = vec![fixed_budget(1, "2025-08", "Bills", 400)];
    let txs = vec![expense(1, d(2025, 8, 1), -400, "bills")];
    let views = budget_views(&budgets, &txs, Decimal::ZERO);
    assert_eq!(views[0].utilization_percent, 100);
    assert!(!views[0].over_budget);
}

#[test]
fn spent_matches_manual_sum_over_normalized_category() {
    let budgets = vec![fixed_budget(1, "2025-08", " FOOD ", 500)];
    let txs = vec![
        expense(1, d(2025, 8, 3), -80, "Food"),
        expense(2, d(2025, 8, 4), -20, "  food "),
        expense(3, d(2025, 8, 5), -99, "transport"),
    ];
    let views = budget_views(&budgets, &txs, Decimal::ZERO);
    assert_eq!(views[0].spent, Decimal::from(100));
}

#[test]
fn budget_window_is_scoped_by_its_own_month() {
    let budgets = vec![fixed_budget(1, "2025-08", "food", 500)];
    let txs = vec![
        expense(1, d(2025, 7, 31), -100, "food"),
        expense(2, d(2025, 8, 1), -10, "food"),
        expense(3, d(2025, 8, 31), -10, "food"),
        expense(4, d(2025, 9, 1), -100, "food"),
    ];
    let views = budget_views(&budgets, &txs, Decimal::ZERO);
    assert_eq!(views[0].spent, Decimal::from(20));
}

#[test]
fn income_and_savings_rows_do_not_count_as_spending() {
    let budgets = vec![fixed_budget(1, "2025-08", "food", 500)];
    let mut salary = expense(1, d(2025, 8, 2), 3000, "food");
    salary.kind = TransactionKind::Income;
    let mut stash = expense(2, d(2025, 8, 2), 200, "savings:regular");
    stash.kind = TransactionKind::Savings;
    let views = budget_views(&budgets, &[salary, stash], Decimal::ZERO);
    assert_eq!(views[0].spent, Decimal::ZERO);
}

#[test]
fn percentage_budget_allocates_share_of_income() {
    let budgets = vec![Budget {
        id: 1,
        month: "2025-08".to_string(),
        category: "Rent".to_string(),
        allocated: None,
        percentage: Some(Decimal::from(20)),
    }];
    let views = budget_views(&budgets, &[], Decimal::from(50000));
    assert_eq!(views[0].allocated, Decimal::from(10000));
}

#[test]
fn percentage_budget_with_no_income_reads_as_unconfigured() {
    let budgets = vec![Budget {
        id: 1,
        month: "2025-08".to_string(),
        category: "Rent".to_string(),
        allocated: None,
        percentage: Some(Decimal::from(20)),
    }];
    let txs = vec![expense(1, d(2025, 8, 3), -150, "rent")];
    let views = budget_views(&budgets, &txs, Decimal::ZERO);
    assert_eq!(views[0].allocated, Decimal::ZERO);
    assert_eq!(views[0].utilization_percent, 0);
    assert!(!views[0].over_budget);
    assert_eq!(views[0].spent, Decimal::from(150));
}

#[test]
fn unmapped_category_gets_default_color_but_full_aggregation() {
    let budgets = vec![fixed_budget(1, "2025-08", "Cosplay", 100)];
    let txs = vec![expense(1, d(2025, 8, 3), -60, "cosplay")];
    let views = budget_views(&budgets, &txs, Decimal::ZERO);
    assert_eq!(views[0].color, "gray");
    assert_eq!(views[0].spent, Decimal::from(60));
    assert_eq!(views[0].utilization_percent, 60);
}

#[test]
fn percentage_room_counts_only_the_requested_month() {
    let budgets = vec![
        Budget {
            id: 1,
            month: "2025-08".to_string(),
            category: "Rent".to_string(),
            allocated: None,
            percentage: Some(Decimal::from(40)),
        },
        Budget {
            id: 2,
            month: "2025-08".to_string(),
            category: "Food".to_string(),
            allocated: None,
            percentage: Some(Decimal::from(25)),
        },
        Budget {
            id: 3,
            month: "2025-09".to_string(),
            category: "Rent".to_string(),
            allocated: None,
            percentage: Some(Decimal::from(90)),
        },
    ];
    assert_eq!(percentage_room(&budgets, "2025-08"), Decimal::from(35));
    assert_eq!(percentage_room(&budgets, "2025-09"), Decimal::from(10));
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE budgets(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            month TEXT NOT NULL,
            category TEXT NOT NULL,
            allocated TEXT,
            percentage TEXT,
            UNIQUE(month, category)
        );
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            amount TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            kind TEXT NOT NULL,
            receipt TEXT
        );
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn percentage_sum_over_100_is_rejected_and_not_persisted() {
    let conn = setup();
    store::insert_budget(&conn, "2025-08", "Rent", None, Some(Decimal::from(60))).unwrap();
    let err = store::insert_budget(&conn, "2025-08", "Food", None, Some(Decimal::from(50)));
    assert!(err.is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM budgets", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);

    // The same share is fine in another month.
    store::insert_budget(&conn, "2025-09", "Food", None, Some(Decimal::from(50))).unwrap();
}

#[test]
fn budget_requires_exactly_one_of_amount_and_percentage() {
    let conn = setup();
    assert!(store::insert_budget(&conn, "2025-08", "Food", None, None).is_err());
    assert!(store::insert_budget(
        &conn,
        "2025-08",
        "Food",
        Some(Decimal::from(100)),
        Some(Decimal::from(10))
    )
    .is_err());
    assert!(store::insert_budget(&conn, "2025-08", "Food", Some(Decimal::ZERO), None).is_err());
    store::insert_budget(&conn, "2025-08", "Food", Some(Decimal::from(100)), None).unwrap();
}
