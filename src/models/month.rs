use chrono::{Datelike, NaiveDate};

use crate::error::{LedgerError, Result};

/// A calendar month, written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (0..=9999).contains(&year) && (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Parse a strict `YYYY-MM` string: four-digit year, hyphen, two-digit month.
    pub fn parse(s: &str) -> Result<Self> {
        if !is_month_shaped(s) {
            return Err(LedgerError::validation(format!(
                "'{s}' is not a month in YYYY-MM format"
            )));
        }
        let (year, month) = s.split_at(4);
        let year: i32 = year
            .parse()
            .map_err(|_| LedgerError::validation(format!("'{s}' has an invalid year")))?;
        let month: u32 = month[1..]
            .parse()
            .map_err(|_| LedgerError::validation(format!("'{s}' has an invalid month")))?;
        Self::new(year, month)
            .ok_or_else(|| LedgerError::validation(format!("'{s}' is not a valid month")))
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

/// Exactly `DDDD-DD` in ASCII digits.
fn is_month_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 7
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 { *b == b'-' } else { b.is_ascii_digit() })
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
