//! Source loading: read the whole input once before the pipeline starts.

use anyhow::{Context, Result};
use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Deref;
use std::path::Path;

use crate::utils::config::SOURCE_MMAP_THRESHOLD;

/// Source bytes, either read into memory or mapped for large files.
pub enum SourceText {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for SourceText {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            SourceText::Owned(v) => v,
            SourceText::Mapped(m) => m,
        }
    }
}

impl From<Vec<u8>> for SourceText {
    fn from(v: Vec<u8>) -> Self {
        SourceText::Owned(v)
    }
}

/// Load `path` in full. A missing or unreadable file is an error, never an empty buffer.
pub fn load_source(path: &Path) -> Result<SourceText> {
    let file = File::open(path).with_context(|| format!("open source {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("stat source {}", path.display()))?
        .len();

    if size > SOURCE_MMAP_THRESHOLD {
        debug!("mapping {} ({} bytes)", path.display(), size);
        // Read-only map; the file is not expected to change during a run.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("map source {}", path.display()))?;
        return Ok(SourceText::Mapped(mmap));
    }

    let mut buf = Vec::with_capacity(size as usize);
    let mut reader = BufReader::new(file);
    reader
        .read_to_end(&mut buf)
        .with_context(|| format!("read source {}", path.display()))?;
    debug!("read {} ({} bytes)", path.display(), buf.len());
    Ok(SourceText::Owned(buf))
}
