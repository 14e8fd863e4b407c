//! Cooperative stop signal for a running batch.
//!
//! The scheduler checks the flag before admitting each queued job. Jobs that
//! are already running finish normally and still report their Outcome; no
//! transfer is killed mid-stream.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct BatchControl {
    stopped: AtomicBool,
}

impl BatchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the scheduler to stop admitting new jobs. Idempotent.
    pub fn request_stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::info!("stop requested; no new jobs will be started");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
