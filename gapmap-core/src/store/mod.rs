//! Data access traits for grids, businesses and social posts.
//!
//! The `GridStore` trait is the only read interface the scoring pipeline
//! depends on. Implementations decide how records are persisted; the
//! pipeline treats every call as a synchronous, possibly failing read.

use std::error::Error as StdError;

use thiserror::Error;

use crate::{Business, Category, Grid, PostType, SocialPost};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SCHEMA_SQL, SqliteGridStore, SqliteGridStoreError};

/// Error raised by a [`GridStore`] read.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed while performing `operation`.
    #[error("store failed to {operation}")]
    Backend {
        /// Description of the failed read.
        operation: &'static str,
        /// Underlying backend error.
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

impl StoreError {
    /// Wrap a backend error with the name of the failed operation.
    pub fn backend<E>(operation: &'static str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            source: Box::new(source),
        }
    }
}

/// Read-only access to the records the scoring pipeline consumes.
///
/// Implementations must be deterministic for a fixed dataset. Orderings are
/// part of the contract: [`GridStore::get_businesses`] sorts by rating
/// descending with unrated businesses last, and [`GridStore::list_posts`]
/// sorts by engagement descending.
///
/// # Examples
///
/// ```rust
/// use gapmap_core::{Category, GridStore, PostType, test_support::MemoryStore};
///
/// let store = MemoryStore::default();
/// assert!(store.list_grid_ids()?.is_empty());
/// assert_eq!(store.count_businesses("g1", Category::Gym)?, 0);
/// assert_eq!(store.count_posts_by_type("g1", &[PostType::Mention])?, 0);
/// # Ok::<(), gapmap_core::StoreError>(())
/// ```
pub trait GridStore {
    /// Return every known grid identifier.
    fn list_grid_ids(&self) -> Result<Vec<String>, StoreError>;

    /// Return the grid with `grid_id`, if it exists.
    fn get_grid(&self, grid_id: &str) -> Result<Option<Grid>, StoreError>;

    /// Count businesses of `category` located in `grid_id`.
    fn count_businesses(&self, grid_id: &str, category: Category) -> Result<u32, StoreError>;

    /// Count posts in `grid_id` whose type is one of `types`.
    ///
    /// Untyped posts never match.
    fn count_posts_by_type(&self, grid_id: &str, types: &[PostType]) -> Result<u32, StoreError>;

    /// Return businesses of `category` in `grid_id`, best rated first.
    fn get_businesses(&self, grid_id: &str, category: Category)
    -> Result<Vec<Business>, StoreError>;

    /// Return up to `limit` posts in `grid_id`, most engaging first.
    fn list_posts(&self, grid_id: &str, limit: usize) -> Result<Vec<SocialPost>, StoreError>;
}

impl<S: GridStore + ?Sized> GridStore for &S {
    fn list_grid_ids(&self) -> Result<Vec<String>, StoreError> {
        (**self).list_grid_ids()
    }

    fn get_grid(&self, grid_id: &str) -> Result<Option<Grid>, StoreError> {
        (**self).get_grid(grid_id)
    }

    fn count_businesses(&self, grid_id: &str, category: Category) -> Result<u32, StoreError> {
        (**self).count_businesses(grid_id, category)
    }

    fn count_posts_by_type(&self, grid_id: &str, types: &[PostType]) -> Result<u32, StoreError> {
        (**self).count_posts_by_type(grid_id, types)
    }

    fn get_businesses(
        &self,
        grid_id: &str,
        category: Category,
    ) -> Result<Vec<Business>, StoreError> {
        (**self).get_businesses(grid_id, category)
    }

    fn list_posts(&self, grid_id: &str, limit: usize) -> Result<Vec<SocialPost>, StoreError> {
        (**self).list_posts(grid_id, limit)
    }
}
