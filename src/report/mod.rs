use rust_decimal::Decimal;

use crate::db::Database;
use crate::error::Result;
use crate::models::{add_amounts, CategoryTotal};

/// Total spending per category across every recorded expense, ordered by
/// category name. Categories with no expenses are left out.
pub(crate) fn category_totals(db: &Database) -> Result<Vec<CategoryTotal>> {
    db.sum_expenses_by_category()
}

/// Sum of all rows of a category report.
pub(crate) fn grand_total(totals: &[CategoryTotal]) -> Result<Decimal> {
    totals
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| add_amounts(acc, t.total))
}
