//! Job scheduler.
//!
//! Runs job descriptors through a [`MediaSource`](crate::source::MediaSource)
//! with a bounded worker pool: resolve → skip archived items → transfer with
//! retry → record in archive. One [`Outcome`](crate::job::Outcome) per job is
//! streamed to the caller as soon as the job finishes.

mod parallel;
mod plan;
mod run;

use std::sync::Arc;
use std::time::Duration;

use crate::archive::CompletionArchive;
use crate::control::BatchControl;
use crate::source::MediaSource;

pub use parallel::run_batch;
pub use plan::{plan_batch, PlanRow};
pub use run::run_one_job;

/// Shared collaborators for one batch run.
#[derive(Clone)]
pub struct BatchContext {
    pub source: Arc<dyn MediaSource>,
    pub archive: Arc<CompletionArchive>,
    pub control: Arc<BatchControl>,
    /// Per-job limit; a job exceeding it is reported as a timeout failure.
    pub job_timeout: Option<Duration>,
}

impl BatchContext {
    pub fn new(source: Arc<dyn MediaSource>, archive: Arc<CompletionArchive>) -> Self {
        Self {
            source,
            archive,
            control: Arc::new(BatchControl::new()),
            job_timeout: None,
        }
    }

    pub fn with_control(mut self, control: Arc<BatchControl>) -> Self {
        self.control = control;
        self
    }

    pub fn with_job_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.job_timeout = timeout;
        self
    }
}
