//! End-to-end coverage of the aggregation, normalisation and scoring pass.
#![forbid(unsafe_code)]

use gapmap_core::test_support::{MemoryStore, business, post};
use gapmap_core::{Category, Grid, OpportunityLevel, PostType};
use geo::Coord;
use rstest::{fixture, rstest};

use crate::{GapScorer, GridScore, generate_rationale, score_category};

const ORIGIN: Coord<f64> = Coord { x: 77.64, y: 12.91 };

fn with_posts(
    mut store: MemoryStore,
    grid_id: &str,
    post_type: PostType,
    count: u32,
) -> MemoryStore {
    for n in 0..count {
        store = store.with_post(post(
            &format!("{grid_id}_{}_{n}", post_type.as_str()),
            grid_id,
            Some(post_type),
            n,
        ));
    }
    store
}

/// Two grids whose maxima match the reference basis `{4, 38, 50}`.
#[fixture]
fn reference_store() -> MemoryStore {
    let mut store = MemoryStore::default()
        .with_grid(Grid::new("grid_hsr_2", "HSR Layout", ORIGIN, ORIGIN))
        .with_grid(Grid::new("grid_hsr_1", "HSR Layout", ORIGIN, ORIGIN));
    for n in 0..4 {
        store = store.with_business(business(
            &format!("gym_{n}"),
            "grid_hsr_2",
            Category::Gym,
            ORIGIN,
            Some(4.0),
        ));
    }
    store = with_posts(store, "grid_hsr_1", PostType::Mention, 28);
    store = with_posts(store, "grid_hsr_1", PostType::Demand, 40);
    store = with_posts(store, "grid_hsr_1", PostType::Complaint, 7);
    store = with_posts(store, "grid_hsr_2", PostType::Mention, 38);
    store = with_posts(store, "grid_hsr_2", PostType::Demand, 50);
    with_posts(store, "grid_hsr_2", PostType::Other, 9)
}

fn find<'a>(rows: &'a [GridScore], grid_id: &str) -> &'a GridScore {
    rows.iter()
        .find(|row| row.score.grid_id == grid_id)
        .unwrap_or_else(|| panic!("no row for {grid_id}"))
}

#[rstest]
fn reference_grid_scores_high(reference_store: MemoryStore) {
    let rows = score_category(&reference_store, Category::Gym, &GapScorer::default())
        .expect("score reference store");
    let row = find(&rows, "grid_hsr_1");

    assert_eq!(
        (
            row.raw.business_count,
            row.raw.instagram_volume,
            row.raw.reddit_mentions
        ),
        (0, 28, 47)
    );
    assert_eq!(row.features.supply_norm, 0.0);
    assert_eq!(row.features.demand_reddit_norm, 0.94);
    assert_eq!(row.score.gos, 0.913);
    assert_eq!(row.score.confidence, 1.0);
    assert_eq!(row.score.opportunity_level, OpportunityLevel::High);
    assert!(row.rationale.starts_with("Strong opportunity"));
}

#[rstest]
fn rows_follow_lexicographic_grid_order(reference_store: MemoryStore) {
    let rows = score_category(&reference_store, Category::Gym, &GapScorer::default())
        .expect("score reference store");
    let ids: Vec<_> = rows.iter().map(|r| r.score.grid_id.as_str()).collect();
    assert_eq!(ids, ["grid_hsr_1", "grid_hsr_2"]);
}

#[rstest]
fn other_categories_see_no_supply(reference_store: MemoryStore) {
    let rows = score_category(&reference_store, Category::Cafe, &GapScorer::default())
        .expect("score cafes");
    assert!(rows.iter().all(|row| row.raw.business_count == 0));
    assert_eq!(find(&rows, "grid_hsr_2").score.gos, 1.0);
}

#[rstest]
fn narrative_and_classification_thresholds_differ() {
    let scorer = GapScorer::default();
    let gos = 0.75;
    let rationale = generate_rationale(&gapmap_core::GridRawMetrics::new("g", 1, 2, 3), gos);
    assert!(rationale.starts_with("Strong opportunity"));
    assert_eq!(scorer.classify(gos), OpportunityLevel::Medium);
}
