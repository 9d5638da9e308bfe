use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable that points at the ledger database.
pub(crate) const DB_ENV_VAR: &str = "FINTRACK_DB";

/// Options pulled off the command line before the command itself.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct GlobalArgs {
    pub db: Option<PathBuf>,
    pub verbose: bool,
    pub rest: Vec<String>,
}

impl GlobalArgs {
    /// Split `--db <path>` and `-v`/`--verbose` from the remaining arguments.
    /// `args` excludes the program name.
    pub(crate) fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--db requires a path"))?;
                    parsed.db = Some(PathBuf::from(path));
                }
                "-v" | "--verbose" => parsed.verbose = true,
                _ => parsed.rest.push(arg.clone()),
            }
        }
        Ok(parsed)
    }
}

/// Where the database lives: `--db`, then `$FINTRACK_DB`, then the platform
/// data directory.
pub(crate) fn resolve_db_path(flag: Option<PathBuf>, env: Option<String>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = env.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_db_path()
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "fintrack", "FinTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("fintrack.db"))
}
