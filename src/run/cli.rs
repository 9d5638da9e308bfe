use anyhow::Result;
use std::io::Write;

use super::format::{format_amount, write_matches, write_report, write_subscriptions};
use crate::budget::{BudgetEngine, SetBudgetOutcome};
use crate::db::Database;
use crate::input;
use crate::models::Month;
use crate::report;
use crate::search;

pub(crate) fn as_cli(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage(out)?;
        return Ok(());
    };
    let rest = &args[1..];
    match command.as_str() {
        "report" | "r" => cli_report(db, out),
        "search" => cli_search(rest, db, out),
        "budget" => cli_budget(rest, db, out),
        "check" => cli_check(rest, db, out),
        "budgets" => cli_budgets(db, out),
        "categories" => cli_categories(db, out),
        "subscriptions" | "subs" => cli_subscriptions(db, out),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "fintrack {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    writeln!(out, "FinTrack — local personal finance ledger")?;
    writeln!(out)?;
    writeln!(out, "Usage: fintrack [--db <path>] [-v] [command]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  (none)                        Launch the interactive menu")?;
    writeln!(out, "  report                        Spending by category")?;
    writeln!(out, "  search <YYYY-MM-DD>           Expenses recorded on a date")?;
    writeln!(out, "  budget <YYYY-MM> <limit>      Set the budget for a month")?;
    writeln!(out, "  check [YYYY-MM]               Budget status (default: current month)")?;
    writeln!(out, "  budgets                       List monthly budgets")?;
    writeln!(out, "  categories                    List categories")?;
    writeln!(out, "  subscriptions                 List subscriptions")?;
    writeln!(out, "  --help, -h                    Show this help")?;
    writeln!(out, "  --version, -V                 Show version")?;
    Ok(())
}

fn cli_report(db: &Database, out: &mut impl Write) -> Result<()> {
    let totals = report::category_totals(db)?;
    write_report(out, &totals, report::grand_total(&totals)?)?;
    writeln!(out, "{} expenses recorded", db.get_expense_count()?)?;
    Ok(())
}

fn cli_search(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: fintrack search <YYYY-MM-DD>");
    };
    let date = input::parse_date(raw)?;
    let matches = search::find_expenses_on_date(db, date)?;
    write_matches(out, date, &matches)?;
    Ok(())
}

fn cli_budget(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    let [month, limit] = args else {
        anyhow::bail!("Usage: fintrack budget <YYYY-MM> <limit>");
    };
    match BudgetEngine::new(db).set_budget(month, limit)? {
        SetBudgetOutcome::Created { month, limit } => {
            writeln!(out, "Budget for {month} set to {}", format_amount(limit))?;
        }
        SetBudgetOutcome::Updated {
            month,
            limit,
            previous_limit,
        } => {
            writeln!(
                out,
                "Budget for {month} updated from {} to {}",
                format_amount(previous_limit),
                format_amount(limit)
            )?;
        }
    }
    Ok(())
}

fn cli_check(args: &[String], db: &Database, out: &mut impl Write) -> Result<()> {
    let month = match args {
        [] => Month::current(),
        [raw] => input::parse_month(raw)?,
        _ => anyhow::bail!("Usage: fintrack check [YYYY-MM]"),
    };
    let status = BudgetEngine::new(db).month_status(month)?;

    writeln!(out, "FinTrack — {}", status.month)?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Spent:      {}", format_amount(status.spent))?;
    match (status.limit_amount, status.remaining()) {
        (Some(limit), Some(remaining)) => {
            writeln!(out, "  Budget:     {}", format_amount(limit))?;
            writeln!(out, "  Remaining:  {}", format_amount(remaining))?;
            if status.is_over() {
                writeln!(out, "  Over budget by {}", format_amount(-remaining))?;
            }
        }
        _ => writeln!(out, "  Budget:     (not set)")?,
    }
    Ok(())
}

fn cli_budgets(db: &Database, out: &mut impl Write) -> Result<()> {
    let budgets = db.get_budgets()?;
    if budgets.is_empty() {
        writeln!(out, "No budgets")?;
        return Ok(());
    }
    writeln!(out, "{:<8} {:>14}", "Month", "Limit")?;
    writeln!(out, "{}", "─".repeat(23))?;
    for budget in &budgets {
        writeln!(
            out,
            "{:<8} {:>14}",
            budget.month.to_string(),
            format_amount(budget.limit_amount)
        )?;
    }
    Ok(())
}

fn cli_categories(db: &Database, out: &mut impl Write) -> Result<()> {
    let categories = db.get_categories()?;
    if categories.is_empty() {
        writeln!(out, "No categories")?;
        return Ok(());
    }
    writeln!(out, "{:<4} Name", "ID")?;
    writeln!(out, "{}", "─".repeat(30))?;
    for cat in &categories {
        writeln!(out, "{:<4} {}", cat.id.unwrap_or(0), cat)?;
    }
    Ok(())
}

fn cli_subscriptions(db: &Database, out: &mut impl Write) -> Result<()> {
    let subs = db.get_subscriptions()?;
    write_subscriptions(out, &subs)?;
    Ok(())
}
