use anyhow::Result;
use chrono::NaiveDate;
use crossterm::style::Stylize;
use std::io::{BufRead, Write};
use tracing::{debug, error};

use super::format::{alert_lines, format_amount, write_matches, write_report};
use crate::budget::{BudgetEngine, SetBudgetOutcome};
use crate::db::Database;
use crate::entry;
use crate::error::LedgerError;
use crate::input;
use crate::models::Expense;
use crate::report;
use crate::search;

const MENU_ITEMS: &[&str] = &[
    "Add Category",
    "Add Expense",
    "Set Monthly Budget",
    "Add Subscription",
    "Search Expenses (Date)",
    "Generate Report (Category-wise)",
    "Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Run the numbered menu on stdin/stdout until the user exits.
pub(crate) fn as_menu(db: &Database) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let styled = std::io::IsTerminal::is_terminal(&stdout);
    let mut session = MenuSession::new(db, stdin.lock(), stdout.lock(), styled);
    session.run()
}

pub(crate) struct MenuSession<'a, R, W> {
    db: &'a Database,
    input: R,
    out: W,
    styled: bool,
    today: Option<NaiveDate>,
}

impl<'a, R: BufRead, W: Write> MenuSession<'a, R, W> {
    pub(crate) fn new(db: &'a Database, input: R, out: W, styled: bool) -> Self {
        Self {
            db,
            input,
            out,
            styled,
            today: None,
        }
    }

    /// Pin the date used when an expense date is left blank.
    #[cfg(test)]
    pub(crate) fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        writeln!(self.out, "System Initialized.")?;
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Enter choice (1-7): ")? else {
                writeln!(self.out)?;
                break;
            };

            let result = match choice.as_str() {
                "1" => self.add_category(),
                "2" => self.add_expense(),
                "3" => self.set_budget(),
                "4" => self.add_subscription(),
                "5" => self.search_expenses(),
                "6" => self.generate_report(),
                "7" => Ok(Flow::Exit),
                _ => {
                    writeln!(self.out, "Invalid choice.")?;
                    Ok(Flow::Continue)
                }
            };

            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => match e.downcast_ref::<LedgerError>() {
                    Some(ledger_err) => self.report_error(ledger_err)?,
                    None => return Err(e),
                },
            }
        }
        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(40);
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "      FINTRACK - FINANCE MANAGER      ")?;
        writeln!(self.out, "{rule}")?;
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            writeln!(self.out, "{}. {item}", i + 1)?;
        }
        writeln!(self.out, "{rule}")?;
        Ok(())
    }

    /// Print a label and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report_error(&mut self, err: &LedgerError) -> Result<()> {
        if err.is_recoverable() {
            debug!(error = %err, "Action rejected");
        } else {
            error!(error = %err, "Action failed");
        }
        let msg = format!("Error: {err}.");
        if self.styled {
            writeln!(self.out, "{}", msg.as_str().red())?;
        } else {
            writeln!(self.out, "{msg}")?;
        }
        Ok(())
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    // ── Actions ───────────────────────────────────────────────

    fn add_category(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n--- Add Category ---")?;
        let Some(name) = self.prompt("Enter category name: ")? else {
            return Ok(Flow::Exit);
        };
        let category = entry::add_category(self.db, &name)?;
        writeln!(self.out, "Success: Category '{}' added.", category.name)?;
        Ok(Flow::Continue)
    }

    fn add_expense(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n--- Add Expense ---")?;
        let categories = self.db.get_categories()?;
        if categories.is_empty() {
            writeln!(self.out, "Error: No categories found. Add a category first.")?;
            return Ok(Flow::Continue);
        }
        writeln!(self.out, "Available Categories:")?;
        for cat in &categories {
            writeln!(self.out, "{}. {}", cat.id.unwrap_or(0), cat.name)?;
        }

        let Some(raw_id) = self.prompt("Enter Category ID: ")? else {
            return Ok(Flow::Exit);
        };
        let category_id = input::parse_id(&raw_id)?;
        entry::require_category(self.db, category_id)?;

        let Some(title) = self.prompt("Enter Expense Title: ")? else {
            return Ok(Flow::Exit);
        };
        let title = input::require_text(&title, "Title")?;
        let Some(raw_amount) = self.prompt("Enter Amount: ")? else {
            return Ok(Flow::Exit);
        };
        let amount = input::parse_amount(&raw_amount)?;
        let Some(raw_date) = self.prompt("Enter Date (YYYY-MM-DD) [Leave empty for today]: ")?
        else {
            return Ok(Flow::Exit);
        };
        let date = input::parse_date_or(&raw_date, self.today())?;

        let expense = Expense::new(title, amount, date, category_id);
        let recorded = entry::add_expense(self.db, &expense)?;
        if let Some(alert) = &recorded.alert {
            let [headline, detail] = alert_lines(alert);
            writeln!(self.out)?;
            if self.styled {
                writeln!(self.out, "{}", headline.as_str().red().bold())?;
                writeln!(self.out, "{}", detail.as_str().yellow())?;
            } else {
                writeln!(self.out, "{headline}")?;
                writeln!(self.out, "{detail}")?;
            }
            writeln!(self.out)?;
        }
        writeln!(
            self.out,
            "Success: Expense '{}' added (id {}).",
            expense.title, recorded.id
        )?;
        Ok(Flow::Continue)
    }

    fn set_budget(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n--- Set Monthly Budget ---")?;
        let Some(raw_month) = self.prompt("Enter Month (YYYY-MM): ")? else {
            return Ok(Flow::Exit);
        };
        let month = input::parse_month(&raw_month)?;
        let Some(raw_limit) = self.prompt("Enter Budget Limit: ")? else {
            return Ok(Flow::Exit);
        };

        let outcome = BudgetEngine::new(self.db).set_budget(&month.to_string(), &raw_limit)?;
        let limit = match outcome {
            SetBudgetOutcome::Created { limit, .. } => limit,
            SetBudgetOutcome::Updated {
                limit,
                previous_limit,
                ..
            } => {
                writeln!(
                    self.out,
                    "Updating existing budget for {month} (Old: {})",
                    format_amount(previous_limit)
                )?;
                limit
            }
        };
        writeln!(
            self.out,
            "Success: Budget for {month} set to {}.",
            format_amount(limit)
        )?;
        Ok(Flow::Continue)
    }

    fn add_subscription(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n--- Add Subscription ---")?;
        let Some(name) = self.prompt("Service Name: ")? else {
            return Ok(Flow::Exit);
        };
        let name = input::require_text(&name, "Service name")?;
        let Some(raw_amount) = self.prompt("Monthly Amount: ")? else {
            return Ok(Flow::Exit);
        };
        let amount = input::parse_amount(&raw_amount)?;
        let Some(raw_date) = self.prompt("Next Due Date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Exit);
        };
        let next_due_date = input::parse_date(&raw_date)?;

        let sub = entry::add_subscription(self.db, &name, amount, next_due_date)?;
        writeln!(self.out, "Success: Subscription '{}' added.", sub.name)?;
        Ok(Flow::Continue)
    }

    fn search_expenses(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n--- Search Expenses by Date ---")?;
        let Some(raw_date) = self.prompt("Enter Date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Exit);
        };
        let date = input::parse_date(&raw_date)?;
        let matches = search::find_expenses_on_date(self.db, date)?;
        writeln!(self.out)?;
        write_matches(&mut self.out, date, &matches)?;
        Ok(Flow::Continue)
    }

    fn generate_report(&mut self) -> Result<Flow> {
        writeln!(self.out, "\n--- Category-wise Spending Report ---")?;
        let totals = report::category_totals(self.db)?;
        let total = report::grand_total(&totals)?;
        write_report(&mut self.out, &totals, total)?;
        Ok(Flow::Continue)
    }
}
