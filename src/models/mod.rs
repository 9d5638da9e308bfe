mod budget;
mod category;
mod expense;
mod month;
mod subscription;

pub use budget::{Budget, BudgetAlert, MonthStatus};
pub use category::{Category, CategoryTotal};
pub use expense::{Expense, ExpenseMatch};
pub use month::Month;
pub use subscription::Subscription;

use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};

/// Text form of every stored and typed date.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Add two amounts, failing instead of panicking when the sum does not fit.
pub(crate) fn add_amounts(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| LedgerError::overflow(format!("{a} + {b} is too large")))
}
