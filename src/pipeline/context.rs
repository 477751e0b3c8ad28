//! Pipeline tuning and the type-erased stage slots the executor launches.

use std::thread::JoinHandle;

use super::cancel::CancelToken;
use super::error_handler::{FirstError, StoppedEarly};
use crate::utils::config::DEFAULT_QUEUE_CAPACITY;

/// Settings shared by every boundary of one run.
#[derive(Clone, Copy, Debug)]
pub struct PipelineTuning {
    /// Capacity of each inter-stage queue. A full queue blocks its producer.
    pub queue_capacity: usize,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Launches one stage thread given the run's cancel token, first-error slot and stopped-early flag.
pub(crate) type StageLauncher = Box<
    dyn FnOnce(CancelToken, FirstError, StoppedEarly) -> std::io::Result<JoinHandle<()>> + Send,
>;

/// One entry of the stage chain. Queues are already wired into `launch` when the slot is built.
pub(crate) struct StageSlot {
    pub name: String,
    pub launch: StageLauncher,
}
