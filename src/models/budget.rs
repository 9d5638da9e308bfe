use rust_decimal::Decimal;

use super::Month;

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub month: Month,
    pub limit_amount: Decimal,
}

impl Budget {
    pub fn new(month: Month, limit_amount: Decimal) -> Self {
        Self {
            id: None,
            month,
            limit_amount,
        }
    }
}

/// Raised when a candidate expense would push a month past its limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAlert {
    pub month: Month,
    pub limit_amount: Decimal,
    pub current_spending: Decimal,
    pub projected_total: Decimal,
}

/// Snapshot of a month's budget against what has been spent so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthStatus {
    pub month: Month,
    pub limit_amount: Option<Decimal>,
    pub spent: Decimal,
}

impl MonthStatus {
    /// Headroom left under the limit; negative once overspent. `None` without
    /// a budget or when the difference does not fit in a `Decimal`.
    pub fn remaining(&self) -> Option<Decimal> {
        self.limit_amount
            .and_then(|limit| limit.checked_sub(self.spent))
    }

    pub fn is_over(&self) -> bool {
        self.limit_amount.is_some_and(|limit| self.spent > limit)
    }
}
