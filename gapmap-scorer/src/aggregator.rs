//! Collapse per-record store data into per-grid counts.
#![forbid(unsafe_code)]

use gapmap_core::{
    Category, DemandChannel, GridRawMetrics, GridStore, NormalizationBasis, StoreError,
};

use crate::{ScoringError, compute_max_values};

/// Raw metrics for every grid of one category plus their shared basis.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedGrids {
    /// Metrics in lexicographic grid order.
    pub metrics: Vec<GridRawMetrics>,
    /// Maxima computed over `metrics`.
    pub basis: NormalizationBasis,
}

impl AggregatedGrids {
    /// Split into metrics and basis.
    #[must_use]
    pub fn into_parts(self) -> (Vec<GridRawMetrics>, NormalizationBasis) {
        (self.metrics, self.basis)
    }
}

/// Counts businesses and classified posts through a [`GridStore`].
///
/// Store failures propagate; an absent grid or a grid with no matching
/// records simply aggregates to zeros.
///
/// # Examples
/// ```
/// use gapmap_core::{Category, test_support::sample_dataset};
/// use gapmap_scorer::Aggregator;
///
/// let store = sample_dataset();
/// let metrics = Aggregator::new(&store)
///     .aggregate_grid_metrics("grid_a", Category::Gym)
///     .expect("aggregate");
/// assert_eq!(metrics.business_count, 2);
/// assert_eq!(metrics.instagram_volume, 2);
/// assert_eq!(metrics.reddit_mentions, 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<S> {
    store: S,
}

impl<S: GridStore> Aggregator<S> {
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Count supply and demand for one grid and category.
    ///
    /// # Errors
    /// Returns [`ScoringError::GridMetrics`] when any store read fails.
    pub fn aggregate_grid_metrics(
        &self,
        grid_id: &str,
        category: Category,
    ) -> Result<GridRawMetrics, ScoringError> {
        self.read_counts(grid_id, category)
            .map_err(|source| ScoringError::GridMetrics {
                grid_id: grid_id.to_owned(),
                category,
                source,
            })
    }

    /// Aggregate every grid in lexicographic order and compute the basis.
    ///
    /// # Errors
    /// Returns [`ScoringError::ListGrids`] when the grid listing fails and
    /// [`ScoringError::GridMetrics`] when any grid cannot be aggregated.
    pub fn aggregate_all_grids(&self, category: Category) -> Result<AggregatedGrids, ScoringError> {
        let mut grid_ids = self
            .store
            .list_grid_ids()
            .map_err(|source| ScoringError::ListGrids { source })?;
        grid_ids.sort_unstable();
        grid_ids.dedup();

        let metrics = grid_ids
            .iter()
            .map(|grid_id| self.aggregate_grid_metrics(grid_id, category))
            .collect::<Result<Vec<_>, _>>()?;
        let basis = compute_max_values(&metrics);
        log::debug!(
            "aggregated {} grids for {category}; basis {:?}",
            metrics.len(),
            basis
        );
        Ok(AggregatedGrids { metrics, basis })
    }

    fn read_counts(&self, grid_id: &str, category: Category) -> Result<GridRawMetrics, StoreError> {
        let business_count = self.store.count_businesses(grid_id, category)?;
        let instagram_volume = self
            .store
            .count_posts_by_type(grid_id, DemandChannel::Instagram.post_types())?;
        let reddit_mentions = self
            .store
            .count_posts_by_type(grid_id, DemandChannel::Reddit.post_types())?;
        let metrics = GridRawMetrics::new(grid_id, business_count, instagram_volume, reddit_mentions);
        log::debug!("{category} metrics for {grid_id}: {metrics:?}");
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapmap_core::test_support::{FailingStore, MemoryStore, sample_dataset};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        sample_dataset()
    }

    #[rstest]
    #[case("grid_a", Category::Gym, GridRawMetrics::new("grid_a", 2, 2, 3))]
    #[case("grid_a", Category::Cafe, GridRawMetrics::new("grid_a", 1, 2, 3))]
    #[case("grid_b", Category::Gym, GridRawMetrics::new("grid_b", 1, 1, 1))]
    #[case("grid_c", Category::Gym, GridRawMetrics::empty("grid_c"))]
    #[case("unknown", Category::Cafe, GridRawMetrics::empty("unknown"))]
    fn aggregates_one_grid(
        store: MemoryStore,
        #[case] grid_id: &str,
        #[case] category: Category,
        #[case] expected: GridRawMetrics,
    ) {
        let metrics = Aggregator::new(&store)
            .aggregate_grid_metrics(grid_id, category)
            .expect("aggregate grid");
        assert_eq!(metrics, expected);
    }

    #[rstest]
    fn aggregates_all_grids_in_lexicographic_order(store: MemoryStore) {
        let (metrics, basis) = Aggregator::new(&store)
            .aggregate_all_grids(Category::Gym)
            .expect("aggregate all grids")
            .into_parts();
        let ids: Vec<_> = metrics.iter().map(|m| m.grid_id.as_str()).collect();
        assert_eq!(ids, ["grid_a", "grid_b", "grid_c"]);
        assert_eq!(basis, NormalizationBasis::from_maxima(2, 2, 3));
    }

    #[rstest]
    fn empty_store_yields_floored_basis() {
        let aggregated = Aggregator::new(MemoryStore::default())
            .aggregate_all_grids(Category::Cafe)
            .expect("aggregate empty store");
        assert!(aggregated.metrics.is_empty());
        assert_eq!(aggregated.basis, NormalizationBasis::default());
    }

    #[rstest]
    fn listing_failures_propagate() {
        let err = Aggregator::new(FailingStore)
            .aggregate_all_grids(Category::Gym)
            .expect_err("listing should fail");
        assert!(matches!(err, ScoringError::ListGrids { .. }));
    }

    #[rstest]
    fn count_failures_name_the_grid() {
        let err = Aggregator::new(FailingStore)
            .aggregate_grid_metrics("grid_a", Category::Gym)
            .expect_err("counting should fail");
        assert_eq!(
            err.to_string(),
            "failed to aggregate Gym metrics for grid grid_a"
        );
    }
}
