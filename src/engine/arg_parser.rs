use clap::Parser;
use std::path::PathBuf;

use crate::{CounterKind, OutputFormat};

/// Count words in a text file through a tokenize → tally → print pipeline.
#[derive(Clone, Parser)]
#[command(name = "wordflow")]
#[command(about = "Print the most frequent words of a text file.")]
pub struct Cli {
    /// Text file to count. Default: mobydick.txt (or `source` from the config file).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Number of ranked words to print.
    #[arg(long, short = 'n')]
    pub top_n: Option<usize>,

    /// Capacity of each inter-stage queue.
    #[arg(long, short = 'q')]
    pub queue_capacity: Option<usize>,

    /// Counting strategy. Both give the same ranking; `indexed` is faster on large inputs.
    #[arg(long, value_enum)]
    pub counter: Option<CounterKind>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Config file. Default: `.wordflow.toml` in the current directory, if present.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging and a progress counter).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
