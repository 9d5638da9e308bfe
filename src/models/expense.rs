use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: i64,
}

impl Expense {
    pub fn new(title: String, amount: Decimal, date: NaiveDate, category_id: i64) -> Self {
        Self {
            id: None,
            title,
            amount,
            date,
            category_id,
        }
    }
}

/// An expense found by date, with its category resolved to a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseMatch {
    pub title: String,
    pub amount: Decimal,
    pub category_name: String,
}
