//! Cross-grid maxima and per-grid rescaling.
#![forbid(unsafe_code)]

use gapmap_core::{GridRawMetrics, NormalizationBasis, NormalizedFeatures};

/// Compute per-field maxima across `metrics`.
///
/// Empty input, or a field whose maximum is zero, floors to `1.0` so later
/// divisions are always defined.
///
/// # Examples
/// ```
/// use gapmap_core::NormalizationBasis;
/// use gapmap_scorer::compute_max_values;
///
/// assert_eq!(compute_max_values(&[]), NormalizationBasis::from_maxima(0, 0, 0));
/// ```
#[must_use]
pub fn compute_max_values(metrics: &[GridRawMetrics]) -> NormalizationBasis {
    let (business, instagram, reddit) =
        metrics
            .iter()
            .fold((0_u32, 0_u32, 0_u32), |(b, i, r), m| {
                (
                    b.max(m.business_count),
                    i.max(m.instagram_volume),
                    r.max(m.reddit_mentions),
                )
            });
    NormalizationBasis::from_maxima(business, instagram, reddit)
}

/// Rescale raw counts against `basis`.
///
/// Values keep full precision; rounding is left to the scorer.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "normalisation divides counts by their cross-grid maxima"
)]
pub fn normalize_metrics(
    metrics: &GridRawMetrics,
    basis: &NormalizationBasis,
) -> NormalizedFeatures {
    NormalizedFeatures {
        supply_norm: f64::from(metrics.business_count) / basis.max_business_count(),
        demand_instagram_norm: f64::from(metrics.instagram_volume) / basis.max_instagram_volume(),
        demand_reddit_norm: f64::from(metrics.reddit_mentions) / basis.max_reddit_mentions(),
    }
}
