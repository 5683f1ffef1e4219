//! In-memory `GridStore` implementations used by unit and behaviour tests.

use std::{cmp::Ordering, io};

use geo::Coord;

use crate::{Business, Category, Grid, GridStore, PostSource, PostType, SocialPost, StoreError};

/// In-memory `GridStore` backed by plain vectors.
///
/// The store performs linear scans and is intended only for small datasets.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    grids: Vec<Grid>,
    businesses: Vec<Business>,
    posts: Vec<SocialPost>,
}

impl MemoryStore {
    /// Add a grid while returning `self` for chaining.
    #[must_use]
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grids.push(grid);
        self
    }

    /// Add a business while returning `self` for chaining.
    #[must_use]
    pub fn with_business(mut self, business: Business) -> Self {
        self.businesses.push(business);
        self
    }

    /// Add a social post while returning `self` for chaining.
    #[must_use]
    pub fn with_post(mut self, post: SocialPost) -> Self {
        self.posts.push(post);
        self
    }
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn rating_order(left: &Business, right: &Business) -> Ordering {
    let by_rating = match (left.rating, right.rating) {
        (Some(l), Some(r)) => r.total_cmp(&l),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_rating.then_with(|| left.id.cmp(&right.id))
}

impl GridStore for MemoryStore {
    fn list_grid_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.grids.iter().map(|grid| grid.id.clone()).collect())
    }

    fn get_grid(&self, grid_id: &str) -> Result<Option<Grid>, StoreError> {
        Ok(self.grids.iter().find(|grid| grid.id == grid_id).cloned())
    }

    fn count_businesses(&self, grid_id: &str, category: Category) -> Result<u32, StoreError> {
        let count = self
            .businesses
            .iter()
            .filter(|b| b.grid_id == grid_id && b.category == category)
            .count();
        Ok(saturating_count(count))
    }

    fn count_posts_by_type(&self, grid_id: &str, types: &[PostType]) -> Result<u32, StoreError> {
        let count = self
            .posts
            .iter()
            .filter(|p| p.grid_id == grid_id)
            .filter(|p| p.post_type.is_some_and(|t| types.contains(&t)))
            .count();
        Ok(saturating_count(count))
    }

    fn get_businesses(
        &self,
        grid_id: &str,
        category: Category,
    ) -> Result<Vec<Business>, StoreError> {
        let mut businesses: Vec<_> = self
            .businesses
            .iter()
            .filter(|b| b.grid_id == grid_id && b.category == category)
            .cloned()
            .collect();
        businesses.sort_by(rating_order);
        Ok(businesses)
    }

    fn list_posts(&self, grid_id: &str, limit: usize) -> Result<Vec<SocialPost>, StoreError> {
        let mut posts: Vec<_> = self
            .posts
            .iter()
            .filter(|p| p.grid_id == grid_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.engagement_score
                .cmp(&a.engagement_score)
                .then_with(|| a.id.cmp(&b.id))
        });
        posts.truncate(limit);
        Ok(posts)
    }
}

/// `GridStore` whose every read fails, for exercising error paths.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingStore;

impl FailingStore {
    fn fail<T>(operation: &'static str) -> Result<T, StoreError> {
        Err(StoreError::backend(
            operation,
            io::Error::other("backend unavailable"),
        ))
    }
}

impl GridStore for FailingStore {
    fn list_grid_ids(&self) -> Result<Vec<String>, StoreError> {
        Self::fail("list grid ids")
    }

    fn get_grid(&self, _grid_id: &str) -> Result<Option<Grid>, StoreError> {
        Self::fail("load grid")
    }

    fn count_businesses(&self, _grid_id: &str, _category: Category) -> Result<u32, StoreError> {
        Self::fail("count businesses")
    }

    fn count_posts_by_type(&self, _grid_id: &str, _types: &[PostType]) -> Result<u32, StoreError> {
        Self::fail("count posts")
    }

    fn get_businesses(
        &self,
        _grid_id: &str,
        _category: Category,
    ) -> Result<Vec<Business>, StoreError> {
        Self::fail("list businesses")
    }

    fn list_posts(&self, _grid_id: &str, _limit: usize) -> Result<Vec<SocialPost>, StoreError> {
        Self::fail("list posts")
    }
}

/// Build a business for fixtures.
#[must_use]
pub fn business(
    id: &str,
    grid_id: &str,
    category: Category,
    location: Coord<f64>,
    rating: Option<f64>,
) -> Business {
    Business {
        id: id.to_owned(),
        name: format!("{category} {id}"),
        category,
        grid_id: grid_id.to_owned(),
        location,
        rating,
        review_count: 0,
    }
}

/// Build a simulated post for fixtures.
#[must_use]
pub fn post(id: &str, grid_id: &str, post_type: Option<PostType>, engagement: u32) -> SocialPost {
    SocialPost {
        id: id.to_owned(),
        grid_id: grid_id.to_owned(),
        source: PostSource::Simulated,
        text: format!("post {id}"),
        post_type,
        engagement_score: engagement,
        link: None,
    }
}

/// Three-grid dataset shared by tests.
///
/// Grids are inserted out of lexicographic order. For `Gym`, `grid_a` holds
/// two businesses (one unrated), two mentions and three demand/complaint
/// posts; `grid_b` holds one of each; `grid_c` is empty.
#[must_use]
pub fn sample_dataset() -> MemoryStore {
    let a = Coord { x: 77.640, y: 12.910 };
    let b = Coord { x: 77.650, y: 12.910 };
    MemoryStore::default()
        .with_grid(Grid::new(
            "grid_c",
            "HSR Layout",
            Coord { x: 77.655, y: 12.900 },
            Coord { x: 77.665, y: 12.910 },
        ))
        .with_grid(Grid::new(
            "grid_a",
            "HSR Layout",
            Coord { x: 77.635, y: 12.905 },
            Coord { x: 77.645, y: 12.915 },
        ))
        .with_grid(Grid::new(
            "grid_b",
            "HSR Layout",
            Coord { x: 77.645, y: 12.905 },
            Coord { x: 77.655, y: 12.915 },
        ))
        .with_business(business("gym_a2", "grid_a", Category::Gym, a, None))
        .with_business(business("gym_a1", "grid_a", Category::Gym, a, Some(4.5)))
        .with_business(business("cafe_a1", "grid_a", Category::Cafe, a, Some(4.0)))
        .with_business(business("gym_b1", "grid_b", Category::Gym, b, Some(3.9)))
        .with_post(post("p1", "grid_a", Some(PostType::Mention), 90))
        .with_post(post("p2", "grid_a", Some(PostType::Mention), 10))
        .with_post(post("p3", "grid_a", Some(PostType::Demand), 40))
        .with_post(post("p4", "grid_a", Some(PostType::Demand), 5))
        .with_post(post("p5", "grid_a", Some(PostType::Complaint), 20))
        .with_post(post("p6", "grid_a", Some(PostType::Other), 30))
        .with_post(post("p7", "grid_a", None, 1))
        .with_post(post("p8", "grid_b", Some(PostType::Mention), 12))
        .with_post(post("p9", "grid_b", Some(PostType::Complaint), 3))
}

/// Persist the contents of a [`MemoryStore`] into a fresh `SQLite` database.
///
/// # Errors
/// Returns the underlying `rusqlite` error when the database cannot be
/// created or populated.
#[cfg(feature = "store-sqlite")]
pub fn write_sqlite_database(
    path: &std::path::Path,
    store: &MemoryStore,
) -> Result<(), rusqlite::Error> {
    let mut connection = rusqlite::Connection::open(path)?;
    connection.execute_batch(crate::store::SCHEMA_SQL)?;
    let tx = connection.transaction()?;
    {
        let mut insert_grid = tx.prepare(
            "INSERT INTO grids (id, neighborhood, lat_min, lat_max, lon_min, lon_max, center_lat, center_lon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for grid in &store.grids {
            insert_grid.execute((
                &grid.id,
                &grid.neighborhood,
                grid.bounds.min().y,
                grid.bounds.max().y,
                grid.bounds.min().x,
                grid.bounds.max().x,
                grid.center.y,
                grid.center.x,
            ))?;
        }

        let mut insert_business = tx.prepare(
            "INSERT INTO businesses (id, name, category, grid_id, lat, lon, rating, review_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for b in &store.businesses {
            insert_business.execute((
                &b.id,
                &b.name,
                b.category.as_str(),
                &b.grid_id,
                b.location.y,
                b.location.x,
                b.rating,
                b.review_count,
            ))?;
        }

        let mut insert_post = tx.prepare(
            "INSERT INTO social_posts (id, grid_id, source, text, post_type, engagement_score, link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for p in &store.posts {
            insert_post.execute((
                &p.id,
                &p.grid_id,
                p.source.as_str(),
                &p.text,
                p.post_type.map(PostType::as_str),
                p.engagement_score,
                p.link.as_deref(),
            ))?;
        }
    }
    tx.commit()
}
