//! Stage chain builder and executor: one thread per stage, first root-cause error wins.

use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::cancel::CancelToken;
use super::context::{PipelineTuning, StageSlot};
use super::error_handler::{
    FirstError, PipelineError, StoppedEarly, classify_stage_error, record_first_error,
    take_run_error,
};
use super::queue::{Inbox, Outbox, closed_inbox, queue};

/// Entry point for building a stage chain.
pub struct Pipeline;

impl Pipeline {
    /// Start a chain whose queues hold at most `tuning.queue_capacity` items each.
    pub fn builder(tuning: PipelineTuning) -> PipelineBuilder<()> {
        Self::builder_with_cancel(tuning, CancelToken::new())
    }

    /// Like [`Pipeline::builder`], but every queue observes an externally owned token
    /// (e.g. one fired from a Ctrl+C handler).
    pub fn builder_with_cancel(
        tuning: PipelineTuning,
        cancel: CancelToken,
    ) -> PipelineBuilder<()> {
        PipelineBuilder {
            tail: closed_inbox(&cancel),
            slots: Vec::new(),
            tuning,
            cancel,
        }
    }
}

/// A stage chain under construction. `T` is the item type of the last stage's output queue,
/// so each `.stage()` call is type-checked against its upstream boundary.
pub struct PipelineBuilder<T> {
    tail: Inbox<T>,
    slots: Vec<StageSlot>,
    tuning: PipelineTuning,
    cancel: CancelToken,
}

impl<T: Send + 'static> PipelineBuilder<T> {
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Append a stage consuming `T` and producing `O`. A new bounded queue becomes its output.
    pub fn stage<O, F>(self, name: &str, f: F) -> PipelineBuilder<O>
    where
        O: Send + 'static,
        F: FnOnce(&Inbox<T>, &Outbox<O>) -> anyhow::Result<()> + Send + 'static,
    {
        let PipelineBuilder {
            tail,
            mut slots,
            tuning,
            cancel,
        } = self;
        let (outbox, next_tail) = queue::<O>(tuning.queue_capacity, &cancel);
        let stage_name = name.to_string();
        slots.push(StageSlot {
            name: stage_name.clone(),
            launch: Box::new(move |cancel, first_error, stopped_early| {
                spawn_stage(
                    stage_name,
                    f,
                    tail,
                    outbox,
                    StageRun {
                        cancel,
                        first_error,
                        stopped_early,
                    },
                )
            }),
        });
        PipelineBuilder {
            tail: next_tail,
            slots,
            tuning,
            cancel,
        }
    }

    /// Launch every stage on its own thread, drain the terminal output, and wait for all stages.
    /// Returns the terminal items in FIFO order, or the first root-cause error.
    pub fn run(self) -> Result<Vec<T>, PipelineError> {
        let PipelineBuilder {
            tail,
            slots,
            tuning: _,
            cancel,
        } = self;
        let start = Instant::now();
        let first_error: FirstError = Arc::new(Mutex::new(None));
        let stopped_early: StoppedEarly = Arc::new(AtomicBool::new(false));
        debug!("pipeline: launching {} stages", slots.len());

        let mut handles: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(slots.len());
        for slot in slots {
            let launched = (slot.launch)(
                cancel.clone(),
                Arc::clone(&first_error),
                Arc::clone(&stopped_early),
            );
            match launched {
                Ok(handle) => handles.push((slot.name, handle)),
                Err(source) => {
                    // Remaining slots are dropped unlaunched, which closes their queues.
                    record_first_error(
                        &first_error,
                        PipelineError::Spawn {
                            stage: slot.name,
                            source,
                        },
                    );
                    cancel.cancel();
                    break;
                }
            }
        }

        let mut output = Vec::new();
        loop {
            match tail.recv() {
                Ok(Some(item)) => output.push(item),
                Ok(None) => break,
                Err(_) => {
                    stopped_early.store(true, Ordering::Release);
                    break;
                }
            }
        }
        drop(tail);

        for (name, handle) in handles {
            if handle.join().is_err() {
                record_first_error(&first_error, PipelineError::StagePanicked { stage: name });
                cancel.cancel();
            }
        }
        debug!(
            "pipeline: all stages joined in {:?}, {} terminal items",
            start.elapsed(),
            output.len()
        );

        match take_run_error(&first_error, stopped_early.load(Ordering::Acquire)) {
            Some(err) => Err(err),
            None => Ok(output),
        }
    }
}

/// Run-wide state each stage thread reports into.
struct StageRun {
    cancel: CancelToken,
    first_error: FirstError,
    stopped_early: StoppedEarly,
}

impl StageRun {
    /// Record a stage's failure and cancel the run. Secondary errors only mark the stop.
    fn fail(&self, err: PipelineError) {
        if err.is_secondary() {
            self.stopped_early.store(true, Ordering::Release);
        } else {
            warn!("{}", err);
            record_first_error(&self.first_error, err);
        }
        self.cancel.cancel();
    }
}

/// Stage wrapper: run `f`, close the output, then drain leftover input so the producer can finish.
/// On failure or panic the token fires before the output closes, so the next stage never
/// mistakes a partial stream for a complete one.
fn spawn_stage<I, O, F>(
    name: String,
    f: F,
    input: Inbox<I>,
    output: Outbox<O>,
    run: StageRun,
) -> std::io::Result<JoinHandle<()>>
where
    I: Send + 'static,
    O: Send + 'static,
    F: FnOnce(&Inbox<I>, &Outbox<O>) -> anyhow::Result<()> + Send + 'static,
{
    let thread_name = format!("stage-{name}");
    let body = move || {
        let started = Instant::now();
        let result = match panic::catch_unwind(AssertUnwindSafe(|| f(&input, &output))) {
            Ok(result) => result,
            Err(payload) => {
                run.fail(PipelineError::StagePanicked {
                    stage: name.clone(),
                });
                drop(output);
                panic::resume_unwind(payload);
            }
        };

        if let Err(err) = result {
            let err = classify_stage_error(&name, err);
            debug!("stage '{}' stopped: {}", name, err);
            run.fail(err);
            return;
        }
        drop(output);

        match input.drain() {
            Ok(0) => {}
            Ok(leftover) => {
                warn!("stage '{}' returned without draining {} items", name, leftover)
            }
            Err(_) => run.stopped_early.store(true, Ordering::Release),
        }
        debug!("stage '{}' finished in {:?}", name, started.elapsed());
    };

    thread::Builder::new().name(thread_name).spawn(body)
}
