//! Weights and thresholds applied by the opportunity scorer.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::ScoringError;

/// Allowed drift when checking that the GOS weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Tunable constants for GOS, confidence and opportunity classification.
///
/// Missing fields deserialise to their defaults, so override files only need
/// to name the values they change.
///
/// # Examples
/// ```
/// use gapmap_scorer::ScoringConfig;
///
/// let config = ScoringConfig::default().validate().expect("defaults are valid");
/// assert_eq!(config.high_threshold, 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the inverted supply term.
    pub supply_weight: f64,
    /// Weight of the Instagram demand term.
    pub instagram_weight: f64,
    /// Weight of the Reddit demand term.
    pub reddit_weight: f64,
    /// Lowest GOS labelled `high`.
    pub high_threshold: f64,
    /// Lowest GOS labelled `medium`.
    pub medium_threshold: f64,
    /// Divisor applied to `ln(1 + instagram_volume)`.
    pub instagram_log_divisor: f64,
    /// Divisor applied to `ln(1 + reddit_mentions)`.
    pub reddit_log_divisor: f64,
    /// Confidence added when both demand channels have posts.
    pub diversity_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            supply_weight: 0.4,
            instagram_weight: 0.25,
            reddit_weight: 0.35,
            high_threshold: 0.8,
            medium_threshold: 0.5,
            instagram_log_divisor: 5.0,
            reddit_log_divisor: 3.0,
            diversity_bonus: 0.2,
        }
    }
}

impl ScoringConfig {
    /// Validate the configuration and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoringError::InvalidConfig`] when a value is not finite or
    /// negative, the weights do not sum to one, a divisor is zero, or the
    /// thresholds fall outside `0.0..=1.0` or are out of order.
    pub fn validate(self) -> Result<Self, ScoringError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
            if value < 0.0 {
                return Err(invalid(field, "must not be negative"));
            }
        }
        if !self.weights_sum_to_one() {
            return Err(invalid("supply_weight", "and the demand weights must sum to 1.0"));
        }
        if self.instagram_log_divisor == 0.0 {
            return Err(invalid("instagram_log_divisor", "must be positive"));
        }
        if self.reddit_log_divisor == 0.0 {
            return Err(invalid("reddit_log_divisor", "must be positive"));
        }
        if self.high_threshold > 1.0 {
            return Err(invalid("high_threshold", "must not exceed 1.0"));
        }
        if self.medium_threshold > self.high_threshold {
            return Err(invalid("medium_threshold", "must not exceed high_threshold"));
        }
        Ok(self)
    }

    const fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("supply_weight", self.supply_weight),
            ("instagram_weight", self.instagram_weight),
            ("reddit_weight", self.reddit_weight),
            ("high_threshold", self.high_threshold),
            ("medium_threshold", self.medium_threshold),
            ("instagram_log_divisor", self.instagram_log_divisor),
            ("reddit_log_divisor", self.reddit_log_divisor),
            ("diversity_bonus", self.diversity_bonus),
        ]
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "validation sums weights to compare against one"
    )]
    fn weights_sum_to_one(&self) -> bool {
        let total = self.supply_weight + self.instagram_weight + self.reddit_weight;
        (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

const fn invalid(field: &'static str, problem: &'static str) -> ScoringError {
    ScoringError::InvalidConfig { field, problem }
}
