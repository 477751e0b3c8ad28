//! CLI command handler: resolve options, load the source, run the pipeline, print timing.

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::core::print_top_words;
use crate::engine::progress::{create_counter, finish_bar, progress_callback};
use crate::engine::source::load_source;
use crate::pipeline::CancelToken;
use crate::utils::{
    apply_env_to_opts, apply_file_to_opts, load_config_file, load_dotenv, load_wordflow_toml,
    setup_logging,
};

/// Overwrite opts field from CLI when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Resolve options: defaults < config file < environment (incl. `.env` in `cwd`) < CLI flags.
pub fn resolve_opts(cli: &Cli, cwd: &Path) -> Result<Opts> {
    let mut opts = Opts::default();
    let file = match &cli.config {
        Some(path) => Some(load_config_file(path)?),
        None => load_wordflow_toml(cwd)?,
    };
    if let Some(file) = &file {
        apply_file_to_opts(file, &mut opts);
    }
    load_dotenv(cwd)?;
    apply_env_to_opts(&mut opts)?;

    apply_cli_opt!(cli, opts, file => source);
    apply_cli_opt!(cli, opts, top_n => top_n);
    apply_cli_opt!(cli, opts, queue_capacity => queue_capacity);
    apply_cli_opt!(cli, opts, counter => counter);
    apply_cli_opt!(cli, opts, format => format);
    apply_cli_opt!(cli, opts, verbose => verbose);
    Ok(opts)
}

/// Count words in the configured source and print the ranked list plus a timing line.
/// Ctrl+C cancels every stage; the run then fails with a cancellation error.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let start = Instant::now();
    let cwd = std::env::current_dir().context("current directory")?;
    let opts = resolve_opts(cli, &cwd)?;
    setup_logging(opts.verbose);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );

    let text = Arc::new(load_source(&opts.source)?);

    let cancel = CancelToken::new();
    let handler_cancel = cancel.clone();
    ctrlc::set_handler(move || handler_cancel.cancel()).context("set Ctrl+C handler")?;

    let bar = opts.verbose.then(|| create_counter("Tallying", " words"));
    let out = BufWriter::new(io::stdout());
    let result = print_top_words(text, &opts, out, Some(cancel), progress_callback(&bar));
    if let Some(bar) = &bar {
        finish_bar(bar);
    }
    result.with_context(|| format!("counting words in {}", opts.source.display()))?;

    println!("Process took {:?}", start.elapsed());
    Ok(())
}
