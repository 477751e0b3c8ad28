//! Byte-level tokenizer: ASCII letters are word characters, every other byte separates words.

use anyhow::Result;

use crate::Word;
use crate::pipeline::Outbox;

/// Iterator over the words of a byte buffer, lowercased.
pub struct Tokens<'a> {
    buf: &'a [u8],
    pos: usize,
    scratch: Vec<u8>,
}

/// Split `buf` into words. A trailing word with no separator after it is still yielded.
pub fn tokenize(buf: &[u8]) -> Tokens<'_> {
    Tokens {
        buf,
        pos: 0,
        scratch: Vec::new(),
    }
}

impl Iterator for Tokens<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        self.scratch.clear();
        while self.pos < self.buf.len() {
            let b = self.buf[self.pos];
            self.pos += 1;
            if b.is_ascii_alphabetic() {
                self.scratch.push(b.to_ascii_lowercase());
            } else if !self.scratch.is_empty() {
                return Some(Word::from_lower_ascii(&self.scratch));
            }
        }
        (!self.scratch.is_empty()).then(|| Word::from_lower_ascii(&self.scratch))
    }
}

/// Tokenizer stage body: push every word of `buf` downstream in order. Returns words sent.
pub fn emit_words(buf: &[u8], out: &Outbox<Word>) -> Result<usize> {
    let mut sent = 0_usize;
    for word in tokenize(buf) {
        out.send(word)?;
        sent += 1;
    }
    log::debug!("tokenizer: {} words", sent);
    Ok(sent)
}
