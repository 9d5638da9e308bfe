//! Monthly budgets and the advisory over-budget check run before an expense
//! is recorded.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::db::Database;
use crate::error::Result;
use crate::input;
use crate::models::{add_amounts, Budget, BudgetAlert, Month, MonthStatus};

/// What `set_budget` did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SetBudgetOutcome {
    Created { month: Month, limit: Decimal },
    Updated {
        month: Month,
        limit: Decimal,
        previous_limit: Decimal,
    },
}

pub(crate) struct BudgetEngine<'a> {
    db: &'a Database,
}

impl<'a> BudgetEngine<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Set the limit for a `YYYY-MM` month, replacing any limit already set
    /// for that exact month.
    pub(crate) fn set_budget(&self, month: &str, limit: &str) -> Result<SetBudgetOutcome> {
        let month = input::parse_month(month)?;
        let limit = input::parse_amount(limit)?;

        let existing = self.db.get_budget_by_month(month)?;
        self.db.upsert_budget(&Budget::new(month, limit))?;

        let outcome = match existing {
            Some(old) => SetBudgetOutcome::Updated {
                month,
                limit,
                previous_limit: old.limit_amount,
            },
            None => SetBudgetOutcome::Created { month, limit },
        };
        info!(%month, %limit, "Budget set");
        Ok(outcome)
    }

    /// Check a candidate expense dated `date` against its month's budget.
    ///
    /// Returns `None` when the month has no budget or the projected total
    /// stays within the limit. The check never blocks the expense.
    pub(crate) fn evaluate_expense(
        &self,
        date: NaiveDate,
        candidate: Decimal,
    ) -> Result<Option<BudgetAlert>> {
        let month = Month::of(date);
        let Some(budget) = self.db.get_budget_by_month(month)? else {
            debug!(%month, "No budget for month");
            return Ok(None);
        };

        let spent = self.db.sum_expense_amounts_for_month(month)?;
        let alert = check_limit(month, budget.limit_amount, spent, candidate)?;
        if let Some(a) = &alert {
            info!(
                %month,
                limit = %a.limit_amount,
                projected = %a.projected_total,
                "Expense exceeds monthly budget"
            );
        }
        Ok(alert)
    }

    /// Limit and month-to-date spending for a month.
    pub(crate) fn month_status(&self, month: Month) -> Result<MonthStatus> {
        let limit_amount = self.db.get_budget_by_month(month)?.map(|b| b.limit_amount);
        let spent = self.db.sum_expense_amounts_for_month(month)?;
        Ok(MonthStatus {
            month,
            limit_amount,
            spent,
        })
    }
}

/// Alert when `spent + candidate` is strictly greater than `limit`.
pub(crate) fn check_limit(
    month: Month,
    limit: Decimal,
    spent: Decimal,
    candidate: Decimal,
) -> Result<Option<BudgetAlert>> {
    let projected = add_amounts(spent, candidate)?;
    Ok((projected > limit).then(|| BudgetAlert {
        month,
        limit_amount: limit,
        current_spending: spent,
        projected_total: projected,
    }))
}
