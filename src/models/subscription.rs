use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub next_due_date: NaiveDate,
}

impl Subscription {
    pub fn new(name: String, amount: Decimal, next_due_date: NaiveDate) -> Self {
        Self {
            id: None,
            name,
            amount,
            next_due_date,
        }
    }
}
