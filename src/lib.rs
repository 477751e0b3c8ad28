//! wordflow: staged pipeline executor over bounded typed queues, with a word-frequency counter on top.

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::sync::Arc;

use crate::engine::SourceText;

/// Result alias used by public wordflow API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Count the words of `text` through the tokenize → tally pipeline and return the ranked top
/// `opts.top_n` records (fewer if there are fewer distinct words). Equal counts keep first-seen order.
///
/// ```ignore
/// let opts = wordflow::Opts { top_n: 3, ..Default::default() };
/// let top = wordflow::top_words(b"aa bb aa cc bb aa".to_vec(), &opts)?;
/// assert_eq!(top[0].word.as_str(), "aa");
/// ```
pub fn top_words(text: impl Into<SourceText>, opts: &Opts) -> Result<Vec<FrequencyRecord>> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let records = engine::rank_words(Arc::new(text.into()), opts, None)?;
    Ok(records)
}
