//! Turns raw text typed at the prompt into typed values.
//!
//! Every parser fails with [`LedgerError::Validation`] so a bad entry aborts
//! the current action without touching the store.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{LedgerError, Result};
use crate::models::{Month, DATE_FORMAT};

/// Largest whole amount accepted at the prompt.
const MAX_WHOLE_AMOUNT: i64 = 1_000_000_000_000;

/// Optional minus, optional `$`, then either comma-grouped thousands or plain
/// digits, with an optional fraction.
#[allow(clippy::expect_used)]
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?)\$?([0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]+)?|[0-9]*\.?[0-9]+)$")
        .expect("amount pattern is valid")
});

/// Parse a money amount. Surrounding whitespace, a leading `$` and commas
/// between thousands groups are accepted.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("amount is required"));
    }
    let not_a_number = || LedgerError::validation(format!("'{trimmed}' is not a number"));
    let caps = AMOUNT_RE.captures(trimmed).ok_or_else(not_a_number)?;
    let cleaned = format!("{}{}", &caps[1], caps[2].replace(',', ""));
    let amount = Decimal::from_str(&cleaned).map_err(|_| not_a_number())?;
    if amount.abs() > Decimal::from(MAX_WHOLE_AMOUNT) {
        return Err(LedgerError::validation(format!(
            "'{trimmed}' exceeds the largest supported amount"
        )));
    }
    Ok(amount)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        LedgerError::validation(format!("'{trimmed}' is not a date in YYYY-MM-DD format"))
    })
}

/// Like [`parse_date`], but an empty entry means `today`.
pub(crate) fn parse_date_or(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    if s.trim().is_empty() {
        Ok(today)
    } else {
        parse_date(s)
    }
}

pub(crate) fn parse_month(s: &str) -> Result<Month> {
    Month::parse(s.trim())
}

pub(crate) fn parse_id(s: &str) -> Result<i64> {
    let trimmed = s.trim();
    trimmed
        .parse()
        .map_err(|_| LedgerError::validation(format!("'{trimmed}' is not a valid ID")))
}

/// Trim a required text field, rejecting it if nothing is left.
pub(crate) fn require_text(s: &str, field: &str) -> Result<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err(LedgerError::validation(format!("{field} cannot be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}
