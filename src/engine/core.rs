//! Word pipeline assembly: tokenize → tally → (optional) sink.

use log::debug;
use std::io::Write;
use std::sync::Arc;

use crate::engine::sink::write_records;
use crate::engine::source::SourceText;
use crate::engine::tally::Tally;
use crate::engine::tokenizer::emit_words;
use crate::pipeline::{
    CancelToken, Inbox, Outbox, Pipeline, PipelineBuilder, PipelineError, PipelineTuning,
};
use crate::{FrequencyRecord, Opts, Word};

/// Tokenizer and tally stages, ending in a queue of ranked records.
pub fn word_stages(
    text: Arc<SourceText>,
    tally: Tally,
    opts: &Opts,
    cancel: Option<CancelToken>,
) -> PipelineBuilder<FrequencyRecord> {
    let tuning = PipelineTuning {
        queue_capacity: opts.queue_capacity,
    };
    let builder = match cancel {
        Some(cancel) => Pipeline::builder_with_cancel(tuning, cancel),
        None => Pipeline::builder(tuning),
    };
    builder
        .stage("tokenize", move |_: &Inbox<()>, out: &Outbox<Word>| {
            emit_words(&text, out).map(|_| ())
        })
        .stage(
            "tally",
            move |input: &Inbox<Word>, out: &Outbox<FrequencyRecord>| tally.run(input, out),
        )
}

/// Run tokenize → tally and return the ranked records.
pub fn rank_words(
    text: Arc<SourceText>,
    opts: &Opts,
    cancel: Option<CancelToken>,
) -> Result<Vec<FrequencyRecord>, PipelineError> {
    let tally = Tally::new(opts.counter, opts.top_n);
    word_stages(text, tally, opts, cancel).run()
}

/// Run tokenize → tally → sink, writing ranked records to `out` in `opts.format`.
pub fn print_top_words<W>(
    text: Arc<SourceText>,
    opts: &Opts,
    mut out: W,
    cancel: Option<CancelToken>,
    on_progress: Option<Box<dyn Fn(usize) + Send>>,
) -> Result<(), PipelineError>
where
    W: Write + Send + 'static,
{
    let mut tally = Tally::new(opts.counter, opts.top_n);
    if let Some(f) = on_progress {
        tally = tally.with_progress(f);
    }
    let format = opts.format;
    word_stages(text, tally, opts, cancel)
        .stage(
            "sink",
            move |input: &Inbox<FrequencyRecord>, _: &Outbox<()>| {
                let written = write_records(input, &mut out, format)?;
                debug!("sink: {} records written", written);
                Ok(())
            },
        )
        .run()
        .map(|_| ())
}
