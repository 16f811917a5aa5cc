//! Scoring module - Evaluation scoring engine
//!
//! Computes sub-totals and the weighted grand total from the two assessment
//! blocks of a case. Scores are derived values: always recomputed on read,
//! never persisted.

mod engine;

pub use engine::*;
