//! Engine: the word-count stages, their assembly, and the CLI around them.

pub mod arg_parser;
pub mod cli;
pub mod core;
pub mod progress;
pub mod sink;
pub mod source;
pub mod tally;
pub mod tokenizer;

pub use arg_parser::Cli;
pub use cli::{handle_run, resolve_opts};
pub use core::{print_top_words, rank_words, word_stages};
pub use sink::{write_record, write_records};
pub use source::{SourceText, load_source};
pub use tally::{Counter, IndexedCounter, LinearCounter, Tally, new_counter, rank, tally_words};
pub use tokenizer::{emit_words, tokenize};
