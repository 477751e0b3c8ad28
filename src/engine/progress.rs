//! Progress counter for the tally stage (verbose mode only).

use kdam::{Animation, Bar, BarExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage).
pub fn create_counter(desc: &'static str, unit: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = unit
    )))
}

/// Advance the bar by `n`. Uses try_lock so a contended bar never blocks a stage.
/// Returns false when the bar was busy and `n` was not added.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) -> bool {
    match pb.try_lock() {
        Ok(mut pb) => {
            let _ = pb.update(n);
            true
        }
        Err(_) => false,
    }
}

/// Final redraw, then move the cursor past the bar so later output starts on a clean line.
pub fn finish_bar(pb: &ProgressBar) {
    if let Ok(mut pb) = pb.lock() {
        let _ = pb.refresh();
        eprintln!();
    }
}

/// Boxed callback that advances `bar`, for stages that report progress.
/// Counts that arrive while the bar is busy are carried into the next update.
pub fn progress_callback(bar: &Option<ProgressBar>) -> Option<Box<dyn Fn(usize) + Send>> {
    bar.as_ref().map(|bar| {
        let bar = Arc::clone(bar);
        let carried = AtomicUsize::new(0);
        Box::new(move |n: usize| {
            let pending = n + carried.swap(0, Ordering::Relaxed);
            if !update_progress_bar(&bar, pending) {
                carried.fetch_add(pending, Ordering::Relaxed);
            }
        }) as Box<dyn Fn(usize) + Send>
    })
}
