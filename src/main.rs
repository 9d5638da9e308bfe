mod budget;
mod config;
mod db;
mod entry;
mod error;
mod input;
mod models;
mod report;
mod run;
mod search;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let globals = config::GlobalArgs::parse(&args)?;
    init_logging(globals.verbose);

    let db_path =
        config::resolve_db_path(globals.db, std::env::var(config::DB_ENV_VAR).ok())?;
    let db = db::Database::open(&db_path)?;

    if globals.rest.is_empty() {
        run::as_menu(&db)
    } else {
        let stdout = std::io::stdout();
        run::as_cli(&globals.rest, &db, &mut stdout.lock())
    }
}

// RUST_LOG wins, then --verbose, then warnings only so the menu stays readable.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}
