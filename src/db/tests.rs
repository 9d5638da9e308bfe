#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn month(s: &str) -> Month {
    Month::parse(s).unwrap()
}

fn add_category(db: &Database, name: &str) -> i64 {
    db.insert_category(&Category::new(name.into())).unwrap()
}

fn add_expense(db: &Database, title: &str, amount: Decimal, on: &str, category_id: i64) -> i64 {
    db.insert_expense(&Expense::new(title.into(), amount, date(on), category_id))
        .unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_categories().unwrap().is_empty());
    assert!(db.get_budgets().unwrap().is_empty());
    assert!(db.get_subscriptions().unwrap().is_empty());
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

#[test]
fn test_schema_version_set() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_double_migrate_idempotent() {
    let mut db = Database::open_in_memory().unwrap();
    add_category(&db, "Food");
    db.migrate().unwrap();
    assert_eq!(db.get_categories().unwrap().len(), 1);
    let rows: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_reopen_on_disk_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    {
        let db = Database::open(&path).unwrap();
        let food = add_category(&db, "Food");
        add_expense(&db, "Lunch", dec!(20), "2024-03-05", food);
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_categories().unwrap().len(), 1);
    assert_eq!(db.get_expense_count().unwrap(), 1);
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = add_category(&db, "Food");
    let fetched = db.get_category_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.name, "Food");
    assert_eq!(fetched.id, Some(id));
}

#[test]
fn test_category_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_category_by_id(99999).unwrap().is_none());
}

#[test]
fn test_categories_listed_in_creation_order() {
    let db = Database::open_in_memory().unwrap();
    add_category(&db, "Travel");
    add_category(&db, "Food");
    let names: Vec<String> = db
        .get_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Travel", "Food"]);
}

#[test]
fn test_duplicate_category_name_rejected() {
    let db = Database::open_in_memory().unwrap();
    add_category(&db, "Food");
    let err = db
        .insert_category(&Category::new("Food".into()))
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateKey(_)));
    assert_eq!(err.to_string(), "Category 'Food' already exists");
    assert_eq!(db.get_categories().unwrap().len(), 1);
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_expense_insert_and_lookup_by_date() {
    let db = Database::open_in_memory().unwrap();
    let food = add_category(&db, "Food");
    let id = add_expense(&db, "Lunch", dec!(20.50), "2024-03-05", food);

    let found = db.expenses_on_date(date("2024-03-05")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(id));
    assert_eq!(found[0].title, "Lunch");
    assert_eq!(found[0].amount, dec!(20.50));
    assert_eq!(found[0].date, date("2024-03-05"));
    assert_eq!(found[0].category_id, food);
}

#[test]
fn test_expenses_on_date_exact_match_only() {
    let db = Database::open_in_memory().unwrap();
    let food = add_category(&db, "Food");
    add_expense(&db, "Before", dec!(1), "2024-03-04", food);
    add_expense(&db, "On", dec!(2), "2024-03-05", food);
    add_expense(&db, "After", dec!(3), "2024-03-06", food);
    add_expense(&db, "Next month", dec!(4), "2024-04-05", food);

    let found = db.expenses_on_date(date("2024-03-05")).unwrap();
    let titles: Vec<&str> = found.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["On"]);
    assert!(db.expenses_on_date(date("2024-03-07")).unwrap().is_empty());
}

#[test]
fn test_expense_with_missing_category_rejected() {
    let db = Database::open_in_memory().unwrap();
    let err = db
        .insert_expense(&Expense::new("Ghost".into(), dec!(5), date("2024-03-05"), 42))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Reference(_)));
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

#[test]
fn test_decimal_precision_preserved() {
    let db = Database::open_in_memory().unwrap();
    let food = add_category(&db, "Food");
    add_expense(&db, "Odd", dec!(0.1), "2024-03-01", food);
    add_expense(&db, "Odd", dec!(0.2), "2024-03-02", food);
    assert_eq!(
        db.sum_expense_amounts_for_month(month("2024-03")).unwrap(),
        dec!(0.3)
    );
}

// ── Month sums ────────────────────────────────────────────────

#[test]
fn test_sum_for_month_matches_year_and_month() {
    let db = Database::open_in_memory().unwrap();
    let food = add_category(&db, "Food");
    add_expense(&db, "Feb end", dec!(100), "2024-02-29", food);
    add_expense(&db, "Mar start", dec!(10), "2024-03-01", food);
    add_expense(&db, "Mar end", dec!(30), "2024-03-31", food);
    add_expense(&db, "Apr start", dec!(1000), "2024-04-01", food);
    add_expense(&db, "Last year", dec!(5000), "2023-03-15", food);

    assert_eq!(
        db.sum_expense_amounts_for_month(month("2024-03")).unwrap(),
        dec!(40)
    );
    assert_eq!(
        db.sum_expense_amounts_for_month(month("2023-03")).unwrap(),
        dec!(5000)
    );
}

#[test]
fn test_sum_for_empty_month_is_zero() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(
        db.sum_expense_amounts_for_month(month("2024-03")).unwrap(),
        Decimal::ZERO
    );
}

// ── Category sums ─────────────────────────────────────────────

#[test]
fn test_sum_by_category_omits_empty_categories() {
    let db = Database::open_in_memory().unwrap();
    let food = add_category(&db, "Food");
    let rent = add_category(&db, "Rent");
    add_category(&db, "Unused");
    add_expense(&db, "Lunch", dec!(20), "2024-03-05", food);
    add_expense(&db, "Dinner", dec!(35.25), "2024-04-10", food);
    add_expense(&db, "March rent", dec!(1200), "2024-03-01", rent);

    let totals = db.sum_expenses_by_category().unwrap();
    assert_eq!(
        totals,
        vec![
            CategoryTotal {
                category_name: "Food".into(),
                total: dec!(55.25),
            },
            CategoryTotal {
                category_name: "Rent".into(),
                total: dec!(1200),
            },
        ]
    );
}

#[test]
fn test_sum_by_category_empty_ledger() {
    let db = Database::open_in_memory().unwrap();
    add_category(&db, "Food");
    assert!(db.sum_expenses_by_category().unwrap().is_empty());
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_crud() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .upsert_budget(&Budget::new(month("2024-01"), dec!(500)))
        .unwrap();
    assert!(id > 0);

    let budget = db.get_budget_by_month(month("2024-01")).unwrap().unwrap();
    assert_eq!(budget.id, Some(id));
    assert_eq!(budget.limit_amount, dec!(500));

    // Upsert with new amount keeps the same row
    let again = db
        .upsert_budget(&Budget::new(month("2024-01"), dec!(600)))
        .unwrap();
    assert_eq!(again, id);
    let budgets = db.get_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].limit_amount, dec!(600));
}

#[test]
fn test_budget_different_months() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_budget(&Budget::new(month("2024-02"), dec!(600)))
        .unwrap();
    db.upsert_budget(&Budget::new(month("2024-01"), dec!(500)))
        .unwrap();

    assert!(db.get_budget_by_month(month("2024-01")).unwrap().is_some());
    assert!(db.get_budget_by_month(month("2024-02")).unwrap().is_some());
    assert!(db.get_budget_by_month(month("2024-03")).unwrap().is_none());

    let months: Vec<String> = db
        .get_budgets()
        .unwrap()
        .iter()
        .map(|b| b.month.to_string())
        .collect();
    assert_eq!(months, vec!["2024-01", "2024-02"]);
}

#[test]
fn test_budget_month_unique_in_schema() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_budget(&Budget::new(month("2024-01"), dec!(500)))
        .unwrap();
    let err = db
        .conn
        .execute(
            "INSERT INTO budgets (month, limit_amount) VALUES ('2024-01', '1')",
            [],
        )
        .unwrap_err();
    assert!(is_unique_violation(&err));
}

// ── Subscriptions ─────────────────────────────────────────────

#[test]
fn test_subscription_insert_and_list() {
    let db = Database::open_in_memory().unwrap();
    db.insert_subscription(&Subscription::new(
        "Gym".into(),
        dec!(40),
        date("2024-05-01"),
    ))
    .unwrap();
    db.insert_subscription(&Subscription::new(
        "Netflix".into(),
        dec!(15.49),
        date("2024-04-12"),
    ))
    .unwrap();

    let subs = db.get_subscriptions().unwrap();
    assert_eq!(subs.len(), 2);
    // Ordered by due date
    assert_eq!(subs[0].name, "Netflix");
    assert_eq!(subs[0].amount, dec!(15.49));
    assert_eq!(subs[1].next_due_date, date("2024-05-01"));
}
