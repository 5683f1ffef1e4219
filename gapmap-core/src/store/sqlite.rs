//! SQLite-backed store implementation for grids, businesses and posts.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params_from_iter};
use thiserror::Error;

use crate::{Business, Category, Grid, PostSource, PostType, SocialPost};

use super::{GridStore, StoreError};

/// Schema expected by [`SqliteGridStore`].
///
/// Coordinates are stored as separate latitude and longitude columns.
/// `post_type` holds lowercase labels and may be `NULL`.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS grids (
    id TEXT PRIMARY KEY,
    neighborhood TEXT NOT NULL,
    lat_min REAL NOT NULL,
    lat_max REAL NOT NULL,
    lon_min REAL NOT NULL,
    lon_max REAL NOT NULL,
    center_lat REAL NOT NULL,
    center_lon REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS businesses (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    grid_id TEXT,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    rating REAL,
    review_count INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS businesses_grid_category ON businesses (grid_id, category);
CREATE TABLE IF NOT EXISTS social_posts (
    id TEXT PRIMARY KEY,
    grid_id TEXT,
    source TEXT NOT NULL,
    text TEXT NOT NULL,
    post_type TEXT,
    engagement_score INTEGER NOT NULL DEFAULT 0,
    link TEXT
);
CREATE INDEX IF NOT EXISTS social_posts_grid ON social_posts (grid_id);
";

const REQUIRED_TABLES: [&str; 3] = ["grids", "businesses", "social_posts"];

/// Error raised when opening a [`SqliteGridStore`].
#[derive(Debug, Error)]
pub enum SqliteGridStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The database lacks one of the tables the store reads.
    #[error("SQLite database at {path} is missing the `{table}` table")]
    MissingTable {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Name of the absent table.
        table: &'static str,
    },
    /// Generic SQLite error while probing the schema.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only grid store backed by a SQLite database.
pub struct SqliteGridStore {
    connection: Connection,
    path: PathBuf,
}

impl fmt::Debug for SqliteGridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteGridStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteGridStore {
    /// Open the database at `database_path` read-only and verify its schema.
    ///
    /// # Errors
    /// Returns [`SqliteGridStoreError`] when the file cannot be opened or a
    /// required table is missing.
    pub fn open<P>(database_path: P) -> Result<Self, SqliteGridStoreError>
    where
        P: AsRef<Path>,
    {
        let path = database_path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqliteGridStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;

        for table in REQUIRED_TABLES {
            let present = connection
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
                    [table],
                    |_| Ok(true),
                )
                .optional()?
                .unwrap_or(false);
            if !present {
                return Err(SqliteGridStoreError::MissingTable {
                    path: path.to_path_buf(),
                    table,
                });
            }
        }

        log::debug!("opened grid store at {}", path.display());
        Ok(Self {
            connection,
            path: path.to_path_buf(),
        })
    }

    fn count(
        &self,
        operation: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<u32, StoreError> {
        let count: i64 = self
            .connection
            .prepare_cached(sql)
            .and_then(|mut statement| statement.query_row(params, |row| row.get(0)))
            .map_err(|source| StoreError::backend(operation, source))?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

fn clamp_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn read_grid(row: &Row<'_>) -> rusqlite::Result<Grid> {
    let id: String = row.get(0)?;
    let neighborhood: String = row.get(1)?;
    let min = Coord {
        x: row.get(4)?,
        y: row.get(2)?,
    };
    let max = Coord {
        x: row.get(5)?,
        y: row.get(3)?,
    };
    let center = Coord {
        x: row.get(7)?,
        y: row.get(6)?,
    };
    Ok(Grid::new(id, neighborhood, min, max).with_center(center))
}

fn read_business(row: &Row<'_>, category: Category) -> rusqlite::Result<Business> {
    Ok(Business {
        id: row.get(0)?,
        name: row.get(1)?,
        category,
        grid_id: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        location: Coord {
            x: row.get(4)?,
            y: row.get(3)?,
        },
        rating: row.get(5)?,
        review_count: row.get(6)?,
    })
}

fn read_post(row: &Row<'_>) -> rusqlite::Result<SocialPost> {
    let source: String = row.get(2)?;
    let post_type: Option<String> = row.get(4)?;
    Ok(SocialPost {
        id: row.get(0)?,
        grid_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        source: PostSource::from_label(&source),
        text: row.get(3)?,
        post_type: post_type.as_deref().map(PostType::from_label),
        engagement_score: row.get(5)?,
        link: row.get(6)?,
    })
}

impl GridStore for SqliteGridStore {
    fn list_grid_ids(&self) -> Result<Vec<String>, StoreError> {
        let operation = "list grid ids";
        let mut statement = self
            .connection
            .prepare_cached("SELECT id FROM grids ORDER BY id")
            .map_err(|source| StoreError::backend(operation, source))?;
        let rows = statement
            .query_map([], |row| row.get(0))
            .map_err(|source| StoreError::backend(operation, source))?;
        rows.collect::<Result<Vec<String>, _>>()
            .map_err(|source| StoreError::backend(operation, source))
    }

    fn get_grid(&self, grid_id: &str) -> Result<Option<Grid>, StoreError> {
        self.connection
            .prepare_cached(
                "SELECT id, neighborhood, lat_min, lat_max, lon_min, lon_max, center_lat, center_lon
                 FROM grids WHERE id = ?1",
            )
            .and_then(|mut statement| statement.query_row([grid_id], read_grid).optional())
            .map_err(|source| StoreError::backend("load grid", source))
    }

    fn count_businesses(&self, grid_id: &str, category: Category) -> Result<u32, StoreError> {
        self.count(
            "count businesses",
            "SELECT COUNT(*) FROM businesses WHERE grid_id = ?1 AND category = ?2",
            (grid_id, category.as_str()),
        )
    }

    fn count_posts_by_type(&self, grid_id: &str, types: &[PostType]) -> Result<u32, StoreError> {
        if types.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; types.len()].join(", ");
        let sql = format!(
            "SELECT COUNT(*) FROM social_posts WHERE grid_id = ? AND lower(trim(post_type)) IN ({placeholders})"
        );
        let params = std::iter::once(grid_id).chain(types.iter().map(|t| t.as_str()));
        self.count("count posts", &sql, params_from_iter(params))
    }

    fn get_businesses(
        &self,
        grid_id: &str,
        category: Category,
    ) -> Result<Vec<Business>, StoreError> {
        let operation = "list businesses";
        let mut statement = self
            .connection
            .prepare_cached(
                "SELECT id, name, grid_id, lat, lon, rating, review_count
                 FROM businesses
                 WHERE grid_id = ?1 AND category = ?2
                 ORDER BY rating IS NULL, rating DESC, id",
            )
            .map_err(|source| StoreError::backend(operation, source))?;
        let rows = statement
            .query_map((grid_id, category.as_str()), |row| {
                read_business(row, category)
            })
            .map_err(|source| StoreError::backend(operation, source))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::backend(operation, source))
    }

    fn list_posts(&self, grid_id: &str, limit: usize) -> Result<Vec<SocialPost>, StoreError> {
        let operation = "list posts";
        let mut statement = self
            .connection
            .prepare_cached(
                "SELECT id, grid_id, source, text, post_type, engagement_score, link
                 FROM social_posts
                 WHERE grid_id = ?1
                 ORDER BY engagement_score DESC, id
                 LIMIT ?2",
            )
            .map_err(|source| StoreError::backend(operation, source))?;
        let rows = statement
            .query_map((grid_id, clamp_limit(limit)), read_post)
            .map_err(|source| StoreError::backend(operation, source))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::backend(operation, source))
    }
}
