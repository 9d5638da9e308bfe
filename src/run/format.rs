use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::{self, Write};

use crate::models::{BudgetAlert, CategoryTotal, ExpenseMatch, Subscription};

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs().round_dp(2);
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// The two warning lines printed when an expense breaks its month's budget.
pub(crate) fn alert_lines(alert: &BudgetAlert) -> [String; 2] {
    [
        format!(
            "[!!!] WARNING: This expense will exceed your budget of {} for {}!",
            format_amount(alert.limit_amount),
            alert.month
        ),
        format!(
            "Current Spending: {}, New Total: {}",
            format_amount(alert.current_spending),
            format_amount(alert.projected_total)
        ),
    ]
}

/// Category table followed by a `Total` row showing `total`.
pub(crate) fn write_report(
    out: &mut impl Write,
    totals: &[CategoryTotal],
    total: Decimal,
) -> io::Result<()> {
    if totals.is_empty() {
        return writeln!(out, "No expenses recorded.");
    }
    writeln!(out, "{:<20} | {:<15}", "Category", "Total Amount")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for row in totals {
        writeln!(
            out,
            "{:<20} | {:<15}",
            row.category_name,
            format_amount(row.total)
        )?;
    }
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(
        out,
        "{:<20} | {:<15}",
        "Total",
        format_amount(total)
    )
}

pub(crate) fn write_matches(
    out: &mut impl Write,
    date: NaiveDate,
    matches: &[ExpenseMatch],
) -> io::Result<()> {
    writeln!(out, "Expenses on {}:", date.format("%Y-%m-%d"))?;
    if matches.is_empty() {
        return writeln!(out, "No records found.");
    }
    for m in matches {
        writeln!(
            out,
            "- {} ({}): {}",
            m.title,
            m.category_name,
            format_amount(m.amount)
        )?;
    }
    Ok(())
}

pub(crate) fn write_subscriptions(out: &mut impl Write, subs: &[Subscription]) -> io::Result<()> {
    if subs.is_empty() {
        return writeln!(out, "No subscriptions");
    }
    writeln!(out, "{:<24} {:>12}  Next Due", "Service", "Amount")?;
    writeln!(out, "{}", "─".repeat(48))?;
    for sub in subs {
        writeln!(
            out,
            "{:<24} {:>12}  {}",
            sub.name,
            format_amount(sub.amount),
            sub.next_due_date.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}
