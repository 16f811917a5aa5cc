//! Scoring Engine - assessment aggregation logic
//!
//! The grand total weighs the requester's self-assessment at 40% and the
//! administrator's assessment at 60%. Arithmetic is done in integer
//! hundredths so repeated recomputation can never drift.

use crate::ApplicationError;
use caseflow_domain::case::Case;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Weights are expressed in hundredths and must sum to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the user block, in hundredths (40 = 0.40)
    pub user_weight: u32,
    /// Weight of the admin block, in hundredths (60 = 0.60)
    pub admin_weight: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            user_weight: 40,
            admin_weight: 60,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.user_weight + self.admin_weight != 100 {
            return Err(ApplicationError::InvalidInput(format!(
                "Scoring weights must sum to 100, got {} + {}",
                self.user_weight, self.admin_weight
            )));
        }
        Ok(())
    }
}

/// Weighted grand total, stored as integer hundredths.
///
/// `user_total * 0.40 + admin_total * 0.60` with exact decimal semantics:
/// a user total of 15 alone yields `GrandTotal(600)`, displayed as `6.00`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrandTotal(i64);

impl GrandTotal {
    pub fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub fn as_hundredths(&self) -> i64 {
        self.0
    }

    /// Lossy float view for callers that insist on one.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for GrandTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

/// Derived scores for one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Sum of the present user sub-scores
    pub user_total: u32,
    /// Sum of the present admin sub-scores
    pub admin_total: u32,
    /// Weighted combination of the two totals
    pub grand_total: GrandTotal,
    /// True once all four admin sub-scores are present
    pub fully_assessed: bool,
}

/// The scoring engine. Stateless apart from its weight configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compute the score report for a case.
    #[instrument(skip(self, case), fields(case_id = %case.id))]
    pub fn score(&self, case: &Case) -> ScoreReport {
        let user_total = case.user_assessment.total();
        let admin_total = case.admin_assessment.total();

        let grand_total = GrandTotal::from_hundredths(
            user_total as i64 * self.config.user_weight as i64
                + admin_total as i64 * self.config.admin_weight as i64,
        );

        ScoreReport {
            user_total,
            admin_total,
            grand_total,
            fully_assessed: case.admin_assessment.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unbalanced_weights_rejected() {
        let config = ScoringConfig {
            user_weight: 50,
            admin_weight: 60,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_grand_total_display() {
        assert_eq!(GrandTotal::from_hundredths(600).to_string(), "6.00");
        assert_eq!(GrandTotal::from_hundredths(1500).to_string(), "15.00");
        assert_eq!(GrandTotal::from_hundredths(1240).to_string(), "12.40");
        assert_eq!(GrandTotal::from_hundredths(5).to_string(), "0.05");
        assert_eq!(GrandTotal::default().to_string(), "0.00");
    }

    #[test]
    fn test_grand_total_as_f64() {
        assert_eq!(GrandTotal::from_hundredths(600).as_f64(), 6.0);
    }
}
