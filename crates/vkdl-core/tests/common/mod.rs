#![allow(dead_code)]

pub mod fake_source;

use std::sync::Arc;
use std::time::Duration;

use vkdl_core::job::{build_jobs, JobDescriptor, JobOptions};
use vkdl_core::retry::{FixedDelay, RetryPolicy};

/// Options with an instant retry policy: `job_retries` retries, no waiting.
pub fn options(job_retries: u32) -> Arc<JobOptions> {
    Arc::new(JobOptions {
        retry: RetryPolicy::new(job_retries, 0, FixedDelay(Duration::ZERO)),
        ..JobOptions::default()
    })
}

pub fn jobs(urls: &[&str], job_retries: u32) -> Vec<JobDescriptor> {
    build_jobs(urls.iter().copied(), options(job_retries))
}
