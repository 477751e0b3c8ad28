//! Staged pipeline executor: typed bounded queues, one thread per stage, cancel on first failure.
//!
//! ```ignore
//! let records = Pipeline::builder(PipelineTuning::default())
//!     .stage("tokenize", move |_: &Inbox<()>, out: &Outbox<Word>| emit_words(&text, out))
//!     .stage("tally", move |input, out| tally.run(input, out))
//!     .run()?;
//! ```

pub mod cancel;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod queue;

pub use cancel::CancelToken;
pub use context::PipelineTuning;
pub use error_handler::PipelineError;
pub use orchestrator::{Pipeline, PipelineBuilder};
pub use queue::{Inbox, Outbox, queue};
