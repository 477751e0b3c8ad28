//! wordflow CLI: print the most frequent words of a text file.

use anyhow::Result;
use clap::Parser;
use wordflow::engine::{Cli, handle_run};

fn main() -> Result<()> {
    let cli = Cli::parse();
    handle_run(&cli)
}
