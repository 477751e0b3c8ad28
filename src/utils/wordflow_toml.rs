//! Load `.wordflow.toml` (CLI only). Library callers build [`Opts`] directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;
use crate::{CounterKind, Opts, OutputFormat};

#[derive(Debug, Default, Deserialize)]
pub struct WordflowToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    source: Option<PathBuf>,
    top_n: Option<usize>,
    queue_capacity: Option<usize>,
    counter: Option<CounterKind>,
    format: Option<OutputFormat>,
    verbose: Option<bool>,
}

/// Parse config text.
pub fn parse_wordflow_toml(s: &str) -> Result<WordflowToml> {
    toml::from_str(s).context("parse config")
}

/// Load an explicitly named config file. Missing or malformed is an error.
pub fn load_config_file(path: &Path) -> Result<WordflowToml> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    parse_wordflow_toml(&s).with_context(|| format!("in {}", path.display()))
}

/// Load `.wordflow.toml` from `dir` if present. `Ok(None)` if there is no such file.
/// Runs before logging is set up, so a malformed file is an error rather than a warning.
pub fn load_wordflow_toml(dir: &Path) -> Result<Option<WordflowToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $sec.$field.clone() {
            $opts.$field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub fn apply_file_to_opts(file: &WordflowToml, opts: &mut Opts) {
    let sec = &file.settings;
    apply_file_opt!(sec, opts, source);
    apply_file_opt!(sec, opts, top_n);
    apply_file_opt!(sec, opts, queue_capacity);
    apply_file_opt!(sec, opts, counter);
    apply_file_opt!(sec, opts, format);
    apply_file_opt!(sec, opts, verbose);
}
