//! Stage completion errors and first-error bookkeeping.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Why a queue operation or a pipeline run did not complete.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("pipeline cancelled")]
    Cancelled,

    #[error("downstream stage stopped receiving")]
    Disconnected,

    #[error("stage '{stage}' failed: {source:#}")]
    StageFailed {
        stage: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("stage '{stage}' panicked")]
    StagePanicked { stage: String },

    #[error("failed to spawn thread for stage '{stage}': {source}")]
    Spawn {
        stage: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// True for errors that are a consequence of another stage's failure rather than a cause.
    pub fn is_secondary(&self) -> bool {
        matches!(self, PipelineError::Cancelled | PipelineError::Disconnected)
    }
}

/// First root-cause error of a run. Later errors never overwrite it.
pub type FirstError = Arc<Mutex<Option<PipelineError>>>;

/// Set once any stage, or the terminal drain, stops before its input is exhausted.
pub type StoppedEarly = Arc<AtomicBool>;

/// Record `err` unless an earlier error is already held. Returns true if `err` was stored.
pub fn record_first_error(slot: &FirstError, err: PipelineError) -> bool {
    let Ok(mut guard) = slot.lock() else {
        return false;
    };
    if guard.is_some() {
        log::debug!("suppressed later error: {}", err);
        return false;
    }
    *guard = Some(err);
    true
}

/// Turn a stage body's error into a pipeline error, keeping cancellation secondary.
/// A stage that just propagated `Cancelled`/`Disconnected` from a queue op with `?` did not fail on its own.
pub fn classify_stage_error(stage: &str, err: anyhow::Error) -> PipelineError {
    match err.downcast::<PipelineError>() {
        Ok(pe) if pe.is_secondary() => pe,
        Ok(pe) => PipelineError::StageFailed {
            stage: stage.to_string(),
            source: pe.into(),
        },
        Err(err) => PipelineError::StageFailed {
            stage: stage.to_string(),
            source: err,
        },
    }
}

/// Take the recorded error after all stages are joined. With nothing recorded, the run is
/// `Cancelled` only if some stage was actually cut short; a cancel that lands after every
/// stage finished leaves a complete result intact.
pub fn take_run_error(slot: &FirstError, stopped_early: bool) -> Option<PipelineError> {
    let recorded = slot.lock().ok().and_then(|mut g| g.take());
    match recorded {
        Some(err) => Some(err),
        None if stopped_early => Some(PipelineError::Cancelled),
        None => None,
    }
}
