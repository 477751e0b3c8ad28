//! Environment overrides: process env first, then `.env` in the working directory.

use anyhow::{Context, Result};
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

const TOP_N_KEY: &str = "TOP_N";
const QUEUE_CAPACITY_KEY: &str = "QUEUE_CAPACITY";

/// Load `.env` from `dir` into the process environment if it exists. Existing vars win.
pub fn load_dotenv(dir: &Path) -> Result<()> {
    let env_path = dir.join(".env");
    if env_path.is_file() {
        dotenvy::from_path(&env_path).with_context(|| format!("load {}", env_path.display()))?;
    }
    Ok(())
}

/// Read `key` through `lookup` and parse it as a count. Unset or blank is `None`.
fn parse_count<F>(lookup: &F, key: &str) -> Result<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    let name = PackagePaths::get().env_var(key);
    match lookup(&name) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .with_context(|| format!("{name}={v:?} is not a non-negative integer")),
        _ => Ok(None),
    }
}

/// Apply `WORDFLOW_TOP_N` / `WORDFLOW_QUEUE_CAPACITY` as returned by `lookup`.
/// Split from [`apply_env_to_opts`] so callers can supply their own environment.
pub fn apply_env_with<F>(lookup: F, opts: &mut Opts) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(n) = parse_count(&lookup, TOP_N_KEY)? {
        opts.top_n = n;
    }
    if let Some(n) = parse_count(&lookup, QUEUE_CAPACITY_KEY)? {
        opts.queue_capacity = n;
    }
    Ok(())
}

/// Apply overrides from the process environment.
pub fn apply_env_to_opts(opts: &mut Opts) -> Result<()> {
    apply_env_with(|k| std::env::var(k).ok(), opts)
}
