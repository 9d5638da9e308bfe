mod schema;

use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{is_unique_violation, LedgerError, Result};
use crate::models::*;

/// The ledger store. Owns the single SQLite connection for the session.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    /// Run raw SQL against the connection, bypassing the typed API.
    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<()> {
        Ok(self.conn.execute_batch(sql)?)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> anyhow::Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            info!(version = schema::CURRENT_VERSION, "Database schema initialized");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(from = current, to = schema::CURRENT_VERSION, "Database schema migrated");
        }

        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    /// Insert a category. A name that is already taken fails with
    /// [`LedgerError::DuplicateKey`].
    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        match self
            .conn
            .execute("INSERT INTO categories (name) VALUES (?1)", params![cat.name])
        {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(LedgerError::DuplicateKey(format!(
                "Category '{}'",
                cat.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM categories WHERE id = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Insert an expense. The category must exist; a dangling id fails with
    /// [`LedgerError::Reference`] and nothing is written.
    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        let result = self.conn.execute(
            "INSERT INTO expenses (title, amount, date, category_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                expense.title,
                expense.amount.to_string(),
                expense.date.format(DATE_FORMAT).to_string(),
                expense.category_id,
            ],
        );
        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Err(LedgerError::Reference(format!(
                    "category {} does not exist",
                    expense.category_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Expenses whose stored date is exactly `date`, in insertion order.
    pub(crate) fn expenses_on_date(&self, date: NaiveDate) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, amount, date, category_id FROM expenses
             WHERE date = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(
            params![date.format(DATE_FORMAT).to_string()],
            expense_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Sum of every expense dated within `month`, matched on the year and
    /// month components of the stored date.
    pub(crate) fn sum_expense_amounts_for_month(&self, month: Month) -> Result<Decimal> {
        let mut stmt = self.conn.prepare(
            "SELECT amount FROM expenses
             WHERE CAST(strftime('%Y', date) AS INTEGER) = ?1
               AND CAST(strftime('%m', date) AS INTEGER) = ?2",
        )?;
        let rows = stmt.query_map(params![month.year(), month.month()], |row| {
            decimal_column(row, 0)
        })?;
        let mut total = Decimal::ZERO;
        for amount in rows {
            total = add_amounts(total, amount?)?;
        }
        Ok(total)
    }

    /// Total spending per category name, for categories with at least one
    /// expense, ordered by name.
    pub(crate) fn sum_expenses_by_category(&self) -> Result<Vec<CategoryTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, e.amount
             FROM expenses e
             JOIN categories c ON c.id = e.category_id",
        )?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            Ok((name, decimal_column(row, 1)?))
        })?;

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            let (name, amount) = row?;
            let total = totals.entry(name).or_insert(Decimal::ZERO);
            *total = add_amounts(*total, amount)?;
        }
        Ok(totals
            .into_iter()
            .map(|(category_name, total)| CategoryTotal {
                category_name,
                total,
            })
            .collect())
    }

    pub(crate) fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budget_by_month(&self, month: Month) -> Result<Option<Budget>> {
        let result = self.conn.query_row(
            "SELECT id, month, limit_amount FROM budgets WHERE month = ?1",
            params![month.to_string()],
            budget_from_row,
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_budgets(&self) -> Result<Vec<Budget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, month, limit_amount FROM budgets ORDER BY month")?;
        let rows = stmt.query_map([], budget_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Insert the budget for its month, or overwrite the limit in place if one
    /// is already set. Returns the row id either way.
    pub(crate) fn upsert_budget(&self, budget: &Budget) -> Result<i64> {
        let id = self.conn.query_row(
            "INSERT INTO budgets (month, limit_amount)
             VALUES (?1, ?2)
             ON CONFLICT(month) DO UPDATE SET limit_amount = excluded.limit_amount
             RETURNING id",
            params![budget.month.to_string(), budget.limit_amount.to_string()],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    // ── Subscriptions ─────────────────────────────────────────

    pub(crate) fn insert_subscription(&self, sub: &Subscription) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO subscriptions (name, amount, next_due_date)
             VALUES (?1, ?2, ?3)",
            params![
                sub.name,
                sub.amount.to_string(),
                sub.next_due_date.format(DATE_FORMAT).to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, amount, next_due_date FROM subscriptions
             ORDER BY next_due_date, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Subscription {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                amount: decimal_column(row, 2)?,
                next_due_date: date_column(row, 3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

// ── Row mapping ───────────────────────────────────────────────

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        amount: decimal_column(row, 2)?,
        date: date_column(row, 3)?,
        category_id: row.get(4)?,
    })
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let month: String = row.get(1)?;
    let month = Month::parse(&month)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(Budget {
        id: Some(row.get(0)?),
        month,
        limit_amount: decimal_column(row, 2)?,
    })
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Decimal::from_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests;
