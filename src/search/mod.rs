use chrono::NaiveDate;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Category, ExpenseMatch};

/// Label used when an expense points at a category that no longer resolves.
pub(crate) const UNKNOWN_CATEGORY: &str = "Unknown";

/// Expenses recorded on exactly `date`, each with its category name.
pub(crate) fn find_expenses_on_date(db: &Database, date: NaiveDate) -> Result<Vec<ExpenseMatch>> {
    let expenses = db.expenses_on_date(date)?;
    if expenses.is_empty() {
        return Ok(Vec::new());
    }

    let categories = db.get_categories()?;
    Ok(expenses
        .into_iter()
        .map(|e| ExpenseMatch {
            category_name: resolve_category_name(&categories, e.category_id),
            title: e.title,
            amount: e.amount,
        })
        .collect())
}

fn resolve_category_name(categories: &[Category], id: i64) -> String {
    Category::find_by_id(categories, id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}
