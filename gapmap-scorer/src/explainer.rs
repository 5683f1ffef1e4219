//! Human-readable context for a scored grid.
//!
//! The explainer is read-only and best effort. Store failures and unknown
//! grids degrade to empty lists with a warning so an explanation never
//! breaks a scoring run.

#![forbid(unsafe_code)]

use gapmap_core::{
    Business, Category, GridRawMetrics, GridStore, PostSource, PostType, SocialPost, haversine_km,
};
use geo::Coord;
use serde::Serialize;

use crate::scorer::round_to;

/// Lowest GOS described as a strong opportunity in rationale text.
pub const STRONG_RATIONALE_THRESHOLD: f64 = 0.7;

/// Lowest GOS described as a moderate opportunity in rationale text.
pub const MODERATE_RATIONALE_THRESHOLD: f64 = 0.4;

/// Characters of post text kept before truncation.
pub const POST_PREVIEW_CHARS: usize = 200;

const ELLIPSIS: &str = "...";
const SIMULATED_LINK_BASE: &str = "https://example.com/simulated";
const DISTANCE_PLACES: usize = 2;

/// Describe a grid's opportunity in one sentence quoting its raw counts.
///
/// The narrative thresholds ([`STRONG_RATIONALE_THRESHOLD`] and
/// [`MODERATE_RATIONALE_THRESHOLD`]) are separate from the classification
/// thresholds, so a grid can read "strong" while labelled `medium`.
///
/// # Examples
/// ```
/// use gapmap_core::GridRawMetrics;
/// use gapmap_scorer::generate_rationale;
///
/// let text = generate_rationale(&GridRawMetrics::new("g", 0, 28, 47), 0.913);
/// assert!(text.starts_with("Strong opportunity"));
/// ```
#[must_use]
pub fn generate_rationale(metrics: &GridRawMetrics, gos: f64) -> String {
    let GridRawMetrics {
        business_count,
        instagram_volume,
        reddit_mentions,
        ..
    } = metrics;
    if gos >= STRONG_RATIONALE_THRESHOLD {
        format!(
            "Strong opportunity: {instagram_volume} Instagram mentions and {reddit_mentions} \
             Reddit requests point to unmet demand with only {business_count} competing \
             businesses nearby."
        )
    } else if gos >= MODERATE_RATIONALE_THRESHOLD {
        format!(
            "Moderate opportunity: {instagram_volume} Instagram mentions and {reddit_mentions} \
             Reddit requests show some demand alongside {business_count} competing businesses."
        )
    } else {
        format!(
            "Limited opportunity: {business_count} competing businesses already serve a grid \
             with {instagram_volume} Instagram mentions and {reddit_mentions} Reddit requests."
        )
    }
}

/// A post quoted as evidence of demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPost {
    /// Post identifier.
    pub id: String,
    /// Post text, truncated to [`POST_PREVIEW_CHARS`] characters.
    pub text: String,
    /// Where the post came from.
    pub source: PostSource,
    /// Post classification, if any.
    pub post_type: Option<PostType>,
    /// Engagement used for ranking.
    pub engagement_score: u32,
    /// Stored link, or a synthetic one for simulated posts.
    pub link: Option<String>,
}

impl TopPost {
    fn from_post(post: SocialPost) -> Self {
        let link = match (post.link, post.source) {
            (Some(link), _) => Some(link),
            (None, PostSource::Simulated) => Some(format!(
                "{SIMULATED_LINK_BASE}/{}/{}",
                post.grid_id, post.id
            )),
            (None, PostSource::External) => None,
        };
        Self {
            text: preview(&post.text),
            id: post.id,
            source: post.source,
            post_type: post.post_type,
            engagement_score: post.engagement_score,
            link,
        }
    }
}

/// A competing business near the grid centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitor {
    /// Business identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Average rating, if known.
    pub rating: Option<f64>,
    /// Number of reviews behind `rating`.
    pub review_count: u32,
    /// Great-circle distance from the grid centre, rounded to 2 decimals.
    pub distance_km: f64,
}

impl Competitor {
    fn from_business(business: Business, center: Coord<f64>) -> Self {
        Self {
            distance_km: round_to(haversine_km(center, business.location), DISTANCE_PLACES),
            id: business.id,
            name: business.name,
            rating: business.rating,
            review_count: business.review_count,
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= POST_PREVIEW_CHARS {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(POST_PREVIEW_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Looks up the posts and competitors behind a grid's score.
#[derive(Debug, Clone, Copy)]
pub struct Explainer<S> {
    store: S,
}

impl<S: GridStore> Explainer<S> {
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Up to `limit` posts in `grid_id`, most engaging first.
    ///
    /// Posts are not tagged by category, so every post in the grid is a
    /// candidate. Store failures yield an empty list.
    #[must_use]
    pub fn get_top_posts(&self, grid_id: &str, category: Category, limit: usize) -> Vec<TopPost> {
        log::debug!("collecting top {limit} posts for {category} in {grid_id}");
        match self.store.list_posts(grid_id, limit) {
            Ok(posts) => posts.into_iter().map(TopPost::from_post).collect(),
            Err(err) => {
                log::warn!("could not list posts for grid {grid_id}: {err}");
                Vec::new()
            }
        }
    }

    /// Up to `limit` businesses of `category` in `grid_id`, best rated first.
    ///
    /// Unknown grids and store failures yield an empty list.
    #[must_use]
    pub fn get_competitors(
        &self,
        grid_id: &str,
        category: Category,
        limit: usize,
    ) -> Vec<Competitor> {
        let center = match self.store.get_grid(grid_id) {
            Ok(Some(grid)) => grid.center,
            Ok(None) => {
                log::warn!("no grid {grid_id}; skipping competitors");
                return Vec::new();
            }
            Err(err) => {
                log::warn!("could not load grid {grid_id}: {err}");
                return Vec::new();
            }
        };
        match self.store.get_businesses(grid_id, category) {
            Ok(businesses) => businesses
                .into_iter()
                .take(limit)
                .map(|business| Competitor::from_business(business, center))
                .collect(),
            Err(err) => {
                log::warn!("could not list {category} businesses for grid {grid_id}: {err}");
                Vec::new()
            }
        }
    }
}
