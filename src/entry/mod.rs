//! Adding categories, expenses and subscriptions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::budget::BudgetEngine;
use crate::db::Database;
use crate::error::{LedgerError, Result};
use crate::input;
use crate::models::{BudgetAlert, Category, Expense, Subscription};

/// A stored expense, plus the budget alert raised while recording it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedExpense {
    pub id: i64,
    pub alert: Option<BudgetAlert>,
}

pub(crate) fn add_category(db: &Database, name: &str) -> Result<Category> {
    let name = input::require_text(name, "Category name")?;
    let mut category = Category::new(name);
    category.id = Some(db.insert_category(&category)?);
    info!(name = %category.name, "Category added");
    Ok(category)
}

/// Look up a category, failing with [`LedgerError::Reference`] if it is missing.
pub(crate) fn require_category(db: &Database, id: i64) -> Result<Category> {
    db.get_category_by_id(id)?
        .ok_or_else(|| LedgerError::Reference(format!("category {id} does not exist")))
}

/// Record an expense. The budget for its month is checked first; an alert is
/// reported back but the expense is stored regardless.
pub(crate) fn add_expense(db: &Database, expense: &Expense) -> Result<RecordedExpense> {
    require_category(db, expense.category_id)?;
    let expense = Expense {
        title: input::require_text(&expense.title, "Title")?,
        ..expense.clone()
    };

    let alert = BudgetEngine::new(db).evaluate_expense(expense.date, expense.amount)?;
    let id = db.insert_expense(&expense)?;
    info!(id, title = %expense.title, amount = %expense.amount, "Expense added");
    Ok(RecordedExpense { id, alert })
}

pub(crate) fn add_subscription(
    db: &Database,
    name: &str,
    amount: Decimal,
    next_due_date: NaiveDate,
) -> Result<Subscription> {
    let name = input::require_text(name, "Service name")?;
    let mut sub = Subscription::new(name, amount, next_due_date);
    sub.id = Some(db.insert_subscription(&sub)?);
    info!(name = %sub.name, "Subscription added");
    Ok(sub)
}
