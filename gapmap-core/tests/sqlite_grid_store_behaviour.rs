#![cfg(feature = "store-sqlite")]
#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for the SQLite-backed grid store.

use std::cell::RefCell;
use std::path::PathBuf;

use gapmap_core::test_support::{sample_dataset, write_sqlite_database};
use gapmap_core::{Category, GridStore, PostType, SqliteGridStore, SqliteGridStoreError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// State shared between the steps of one scenario.
pub struct World {
    temp_dir: TempDir,
    db_path: RefCell<Option<PathBuf>>,
    opened: RefCell<Option<Result<SqliteGridStore, SqliteGridStoreError>>>,
}

#[fixture]
/// Build a fresh world with its own temporary directory.
pub fn world() -> World {
    World {
        temp_dir: TempDir::new().expect("create tempdir for scenario"),
        db_path: RefCell::new(None),
        opened: RefCell::new(None),
    }
}

fn opened_store(world: &World) -> std::cell::Ref<'_, SqliteGridStore> {
    std::cell::Ref::map(world.opened.borrow(), |opened| {
        opened
            .as_ref()
            .expect("store should have been opened")
            .as_ref()
            .expect("store should open")
    })
}

#[given("a SQLite database seeded with the sample grids")]
fn seeded_database(world: &World) {
    let path = world.temp_dir.path().join("grids.db");
    write_sqlite_database(&path, &sample_dataset()).expect("seed database");
    *world.db_path.borrow_mut() = Some(path);
}

#[given("a SQLite database without a businesses table")]
fn database_without_businesses(world: &World) {
    let path = world.temp_dir.path().join("partial.db");
    let connection = rusqlite::Connection::open(&path).expect("create database");
    connection
        .execute_batch(
            "CREATE TABLE grids (id TEXT PRIMARY KEY);
             CREATE TABLE social_posts (id TEXT PRIMARY KEY);",
        )
        .expect("create partial schema");
    *world.db_path.borrow_mut() = Some(path);
}

#[when("I open the grid store")]
fn open_store(world: &World) {
    let path = world
        .db_path
        .borrow()
        .clone()
        .expect("database path must be initialised");
    *world.opened.borrow_mut() = Some(SqliteGridStore::open(path));
}

#[then("the grid ids are listed in identifier order")]
fn grid_ids_listed(world: &World) {
    let ids = opened_store(world).list_grid_ids().expect("list grid ids");
    assert_eq!(ids, ["grid_a", "grid_b", "grid_c"]);
}

#[then("grid_a has two gyms with the unrated gym last")]
fn gyms_in_grid_a(world: &World) {
    let gyms = opened_store(world)
        .get_businesses("grid_a", Category::Gym)
        .expect("list gyms");
    let ids: Vec<_> = gyms.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["gym_a1", "gym_a2"]);
    assert_eq!(gyms.last().and_then(|b| b.rating), None);
}

#[then("grid_a has two mentions and three demand posts")]
fn posts_in_grid_a(world: &World) {
    let store = opened_store(world);
    let mentions = store
        .count_posts_by_type("grid_a", &PostType::INSTAGRAM)
        .expect("count mentions");
    let demand = store
        .count_posts_by_type("grid_a", &PostType::REDDIT)
        .expect("count demand");
    assert_eq!((mentions, demand), (2, 3));
}

#[then("opening fails because the businesses table is missing")]
fn missing_businesses_table(world: &World) {
    let opened = world.opened.borrow_mut().take().expect("open attempted");
    match opened {
        Err(SqliteGridStoreError::MissingTable { table, .. }) => assert_eq!(table, "businesses"),
        other => panic!("expected a missing table error, found {other:?}"),
    }
}

#[scenario(path = "tests/features/sqlite_grid_store.feature", index = 0)]
fn seeded_store_matches_records(world: World) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_grid_store.feature", index = 1)]
fn incomplete_schema_is_rejected(world: World) {
    let _ = world;
}
