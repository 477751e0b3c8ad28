//! Frequency tally: count words, rank by count, emit the top N.

use anyhow::Result;
use log::debug;
use std::collections::HashMap;

use crate::pipeline::{Inbox, Outbox};
use crate::utils::config::TALLY_PROGRESS_BATCH;
use crate::{CounterKind, FrequencyRecord, Word};

/// Word counter. Records are kept in first-seen order so ranking ties are reproducible.
pub trait Counter: Send {
    fn observe(&mut self, word: Word);
    fn distinct(&self) -> usize;
    fn into_records(self: Box<Self>) -> Vec<FrequencyRecord>;
}

/// Linear scan over every distinct word seen so far.
#[derive(Default)]
pub struct LinearCounter {
    records: Vec<FrequencyRecord>,
}

impl Counter for LinearCounter {
    fn observe(&mut self, word: Word) {
        // Hot spot: O(distinct) per word.
        match self.records.iter_mut().find(|r| r.word == word) {
            Some(r) => r.count += 1,
            None => self.records.push(FrequencyRecord { word, count: 1 }),
        }
    }

    fn distinct(&self) -> usize {
        self.records.len()
    }

    fn into_records(self: Box<Self>) -> Vec<FrequencyRecord> {
        self.records
    }
}

/// Same first-seen record list, with a hash index from word to position.
#[derive(Default)]
pub struct IndexedCounter {
    records: Vec<FrequencyRecord>,
    index: HashMap<Word, usize>,
}

impl Counter for IndexedCounter {
    fn observe(&mut self, word: Word) {
        if let Some(&i) = self.index.get(&word) {
            self.records[i].count += 1;
            return;
        }
        self.index.insert(word.clone(), self.records.len());
        self.records.push(FrequencyRecord { word, count: 1 });
    }

    fn distinct(&self) -> usize {
        self.records.len()
    }

    fn into_records(self: Box<Self>) -> Vec<FrequencyRecord> {
        self.records
    }
}

pub fn new_counter(kind: CounterKind) -> Box<dyn Counter> {
    match kind {
        CounterKind::Linear => Box::new(LinearCounter::default()),
        CounterKind::Indexed => Box::new(IndexedCounter::default()),
    }
}

/// Sort by count descending and keep at most `top_n`. The sort is stable, so equal counts
/// stay in first-seen order.
pub fn rank(mut records: Vec<FrequencyRecord>, top_n: usize) -> Vec<FrequencyRecord> {
    records.sort_by(|a, b| b.count.cmp(&a.count));
    records.truncate(top_n);
    records
}

/// Count every word of `words` and return the ranked top `top_n`. Synchronous form of [`Tally::run`].
pub fn tally_words<I>(words: I, kind: CounterKind, top_n: usize) -> Vec<FrequencyRecord>
where
    I: IntoIterator<Item = Word>,
{
    let mut counter = new_counter(kind);
    for w in words {
        counter.observe(w);
    }
    rank(counter.into_records(), top_n)
}

/// Tally stage. Emits nothing until its input is closed and drained.
pub struct Tally {
    pub kind: CounterKind,
    pub top_n: usize,
    /// Called with the number of words since the last call, every [`TALLY_PROGRESS_BATCH`] words and once at the end.
    pub on_progress: Option<Box<dyn Fn(usize) + Send>>,
}

impl Tally {
    pub fn new(kind: CounterKind, top_n: usize) -> Self {
        Self {
            kind,
            top_n,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, f: Box<dyn Fn(usize) + Send>) -> Self {
        self.on_progress = Some(f);
        self
    }

    /// Stage body: consume `input` until closed, then send the ranked records to `out`.
    pub fn run(self, input: &Inbox<Word>, out: &Outbox<FrequencyRecord>) -> Result<()> {
        let mut counter = new_counter(self.kind);
        let mut total = 0_usize;
        let mut pending = 0_usize;
        while let Some(word) = input.recv()? {
            counter.observe(word);
            total += 1;
            pending += 1;
            if pending == TALLY_PROGRESS_BATCH {
                if let Some(f) = &self.on_progress {
                    f(pending);
                }
                pending = 0;
            }
        }
        if pending > 0
            && let Some(f) = &self.on_progress
        {
            f(pending);
        }
        debug!(
            "tally: {} words, {} distinct ({:?} counter)",
            total,
            counter.distinct(),
            self.kind
        );

        for record in rank(counter.into_records(), self.top_n) {
            out.send(record)?;
        }
        Ok(())
    }
}
