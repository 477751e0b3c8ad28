//! Application configuration constants.
//! Defaults and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                env_prefix: format!("{}_", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory config file, e.g. `.wordflow.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable name for `key`, e.g. `WORDFLOW_TOP_N`.
    pub fn env_var(&self, key: &str) -> String {
        format!("{}{}", self.env_prefix, key)
    }
}

// ---- Pipeline ----

/// Ranked records emitted by the tally stage.
pub const DEFAULT_TOP_N: usize = 20;

/// Items each inter-stage queue holds before the producer blocks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Input file when none is given on the command line.
pub const DEFAULT_SOURCE: &str = "mobydick.txt";

// ---- Source loading ----

/// File size above which the source is memory-mapped instead of read (bytes). 64 MB.
pub const SOURCE_MMAP_THRESHOLD: u64 = 64 * 1024 * 1024;

// ---- Progress ----

/// Words tallied between progress bar updates (reduce lock contention).
pub const TALLY_PROGRESS_BATCH: usize = 1000;
