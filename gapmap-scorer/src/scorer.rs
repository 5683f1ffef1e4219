//! Gap Opportunity Score, confidence and opportunity classification.
//!
//! Every operation here is a pure function of its inputs and the held
//! [`ScoringConfig`]. Malformed numbers are never an error: non-finite
//! features count as zero and results are clamped into `0.0..=1.0`.

#![forbid(unsafe_code)]

use gapmap_core::{GridRawMetrics, NormalizedFeatures, OpportunityLevel, ScoreResult};

use crate::{ScoringConfig, ScoringError};

/// Decimal places kept on published scores.
const SCORE_PLACES: usize = 3;

/// Scores grids with a fixed, validated configuration.
///
/// # Examples
/// ```
/// use gapmap_core::{GridRawMetrics, NormalizedFeatures, OpportunityLevel};
/// use gapmap_scorer::GapScorer;
///
/// let scorer = GapScorer::default();
/// let result = scorer.score_grid(
///     "g1",
///     &GridRawMetrics::empty("g1"),
///     &NormalizedFeatures::default(),
/// );
/// assert_eq!(result.gos, 0.4);
/// assert_eq!(result.confidence, 0.0);
/// assert_eq!(result.opportunity_level, OpportunityLevel::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GapScorer {
    config: ScoringConfig,
}

impl GapScorer {
    /// Build a scorer after validating `config`.
    ///
    /// # Errors
    /// Returns [`ScoringError::InvalidConfig`] when `config` fails
    /// [`ScoringConfig::validate`].
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    /// Weighted sum of inverted supply and both demand channels.
    ///
    /// All-zero features yield the supply-only baseline, `0.4` with the
    /// default weights.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "GOS is a weighted sum of normalised features"
    )]
    pub fn calculate_gos(&self, features: &NormalizedFeatures) -> f64 {
        let supply = finite_or_zero(features.supply_norm);
        let instagram = finite_or_zero(features.demand_instagram_norm);
        let reddit = finite_or_zero(features.demand_reddit_norm);
        let gos = (1.0 - supply) * self.config.supply_weight
            + instagram * self.config.instagram_weight
            + reddit * self.config.reddit_weight;
        round_to(unit_interval(gos), SCORE_PLACES)
    }

    /// Logarithmic data-volume confidence with a two-channel diversity bonus.
    ///
    /// The bonus applies only when both channels have at least one post.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "confidence sums scaled logarithms of post counts"
    )]
    pub fn calculate_confidence(&self, metrics: &GridRawMetrics) -> f64 {
        let instagram = f64::from(metrics.instagram_volume).ln_1p();
        let reddit = f64::from(metrics.reddit_mentions).ln_1p();
        let bonus = if metrics.instagram_volume > 0 && metrics.reddit_mentions > 0 {
            self.config.diversity_bonus
        } else {
            0.0
        };
        let confidence = instagram / self.config.instagram_log_divisor
            + reddit / self.config.reddit_log_divisor
            + bonus;
        round_to(unit_interval(confidence), SCORE_PLACES)
    }

    /// Bucket a GOS against the high and medium thresholds.
    #[must_use]
    pub fn classify(&self, gos: f64) -> OpportunityLevel {
        if gos >= self.config.high_threshold {
            OpportunityLevel::High
        } else if gos >= self.config.medium_threshold {
            OpportunityLevel::Medium
        } else {
            OpportunityLevel::Low
        }
    }

    /// Score one grid from its raw counts and normalised features.
    #[must_use]
    pub fn score_grid(
        &self,
        grid_id: &str,
        metrics: &GridRawMetrics,
        features: &NormalizedFeatures,
    ) -> ScoreResult {
        let gos = self.calculate_gos(features);
        ScoreResult {
            grid_id: grid_id.to_owned(),
            gos,
            confidence: self.calculate_confidence(metrics),
            opportunity_level: self.classify(gos),
        }
    }
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

const fn unit_interval(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, 1.0)
}

/// Round `value` to `places` decimals from its exact binary value.
///
/// `0.6625` is stored just below the decimal and so rounds to `0.662`.
pub(crate) fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
