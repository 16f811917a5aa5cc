//! Redis-backed job queue.
//!
//! The producer side lives here so the write path can enqueue fan-out jobs
//! right after a commit; the consumer pool lives in the worker binary.

pub mod job;
pub mod producer;

pub use job::{
    CaseActivityJob, CaseCreatedFanoutJob, Job, JobPriority, JobStatus, JobType,
    NotificationChannel, SendNotificationJob,
};
pub use producer::JobProducer;

/// Redis key prefix shared by producer and consumer.
pub const DEFAULT_QUEUE_PREFIX: &str = "caseflow";
