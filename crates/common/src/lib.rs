//! Common utilities and shared functionality for the Caseflow platform.
//!
//! This crate provides foundational utilities used across all services:
//! - Configuration management
//! - Telemetry and structured logging
//! - Pagination helpers
//! - DateTime operations
//! - Retry logic with backoff

pub mod config;
pub mod datetime;
pub mod pagination;
pub mod retry;
pub mod telemetry;

// Re-export commonly used types
pub use config::AppConfig;
pub use datetime::{format_datetime, now_utc, parse_datetime};
pub use pagination::{DateRange, PaginatedResult, PaginationParams, SortDirection, SortParams};
pub use retry::{retry_with_backoff, retry_with_predicate, ExponentialBackoff, RetryConfig};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
