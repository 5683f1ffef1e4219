//! Grid store construction for CLI commands.

use camino::Utf8Path;
use gapmap_core::GridStore;

use crate::CliError;

/// Opens the grid store a command reads from.
pub(crate) trait StoreOpener {
    fn open(&self, database: &Utf8Path) -> Result<Box<dyn GridStore>, CliError>;
}

/// Opens the SQLite database named on the command line.
pub(crate) struct SqliteStoreOpener;

impl StoreOpener for SqliteStoreOpener {
    #[cfg(feature = "store-sqlite")]
    fn open(&self, database: &Utf8Path) -> Result<Box<dyn GridStore>, CliError> {
        let store = gapmap_core::SqliteGridStore::open(database.as_std_path())?;
        Ok(Box::new(store))
    }

    #[cfg(not(feature = "store-sqlite"))]
    fn open(&self, _database: &Utf8Path) -> Result<Box<dyn GridStore>, CliError> {
        Err(CliError::MissingFeature {
            feature: "store-sqlite",
            action: "opening a grid database",
        })
    }
}
