//! Repository implementations for data persistence.
//!
//! PostgreSQL-backed implementations of the persistence ports defined in the
//! application layer.

mod case_repository;

pub use case_repository::*;
