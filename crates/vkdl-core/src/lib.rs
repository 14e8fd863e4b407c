pub mod archive;
pub mod config;
pub mod control;
pub mod input;
pub mod job;
pub mod logging;
pub mod report;
pub mod retry;
pub mod scheduler;
pub mod source;
