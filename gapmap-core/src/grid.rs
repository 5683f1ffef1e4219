//! Grid cells and the records located inside them.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`, matching
//! `geo` conventions.

use geo::{Coord, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Category, PostSource, PostType};

/// A fixed-bounds sub-region of a neighbourhood; the unit of analysis.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gapmap_core::Grid;
///
/// let grid = Grid::new(
///     "hsr_01",
///     "HSR Layout",
///     Coord { x: 77.63, y: 12.90 },
///     Coord { x: 77.64, y: 12.91 },
/// );
/// assert_eq!(grid.center, Coord { x: 77.635, y: 12.905 });
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    /// Unique grid identifier.
    pub id: String,
    /// Neighbourhood the grid belongs to.
    pub neighborhood: String,
    /// Axis-aligned bounds of the cell.
    pub bounds: Rect<f64>,
    /// Centre point used for distance calculations.
    pub center: Coord<f64>,
}

impl Grid {
    /// Construct a grid from two opposite corners, deriving its centre.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        neighborhood: impl Into<String>,
        min: Coord<f64>,
        max: Coord<f64>,
    ) -> Self {
        let bounds = Rect::new(min, max);
        Self {
            id: id.into(),
            neighborhood: neighborhood.into(),
            bounds,
            center: bounds.center(),
        }
    }

    /// Override the centre, for datasets that store it explicitly.
    #[must_use]
    pub fn with_center(mut self, center: Coord<f64>) -> Self {
        self.center = center;
        self
    }
}

/// An existing business competing within a category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Business {
    /// Unique identifier, typically a place id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category the business competes in.
    pub category: Category,
    /// Grid containing the business.
    pub grid_id: String,
    /// Location of the business.
    pub location: Coord<f64>,
    /// Average rating, when known.
    pub rating: Option<f64>,
    /// Number of reviews behind the rating.
    pub review_count: u32,
}

/// A social post attributed to a grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SocialPost {
    /// Unique identifier.
    pub id: String,
    /// Grid the post was attributed to.
    pub grid_id: String,
    /// Where the post came from.
    pub source: PostSource,
    /// Post body.
    pub text: String,
    /// Classification; `None` when the post was never classified.
    pub post_type: Option<PostType>,
    /// Likes, upvotes or similar engagement total.
    pub engagement_score: u32,
    /// Permalink, when the source provides one.
    pub link: Option<String>,
}
