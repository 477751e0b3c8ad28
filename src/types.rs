//! Public types for the word pipeline: words, frequency records, and resolved options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::utils::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SOURCE, DEFAULT_TOP_N};

/// A maximal run of case-folded ASCII letters. Only the tokenizer builds these from bytes,
/// so the contents are always lowercase `a..=z`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// Build a word from a string, lowercasing it. Returns `None` unless every char is an ASCII letter.
    pub fn new(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(Word(s.to_ascii_lowercase()))
    }

    /// Caller guarantees `bytes` are lowercase ASCII letters.
    pub(crate) fn from_lower_ascii(bytes: &[u8]) -> Self {
        Word(bytes.iter().map(|&b| char::from(b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A word and how many times it occurred. `count` is at least 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrequencyRecord {
    pub word: Word,
    pub count: usize,
}

/// How the sink renders records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `  <count> <word>` per line.
    #[default]
    Text,
    /// One `{"word":..,"count":..}` object per line.
    Json,
}

/// Which counter the tally stage uses. Both produce identical rankings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    /// Linear scan over distinct words per insertion, O(n·d).
    #[default]
    Linear,
    /// Same record list plus a hash index, O(n).
    Indexed,
}

/// Fully resolved options: defaults, then `.wordflow.toml`, then environment, then CLI.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Text file to count.
    pub source: PathBuf,
    /// How many ranked records to emit.
    pub top_n: usize,
    /// Capacity of each inter-stage queue.
    pub queue_capacity: usize,
    pub counter: CounterKind,
    pub format: OutputFormat,
    /// Debug logging and the tally progress counter.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            top_n: DEFAULT_TOP_N,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            counter: CounterKind::default(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}
