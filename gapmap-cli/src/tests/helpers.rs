//! Test helpers for CLI workspaces and stub grid stores.

use camino::{Utf8Path, Utf8PathBuf};
use gapmap_core::GridStore;
use gapmap_core::test_support::{MemoryStore, sample_dataset};
use tempfile::TempDir;

use crate::CliError;
use crate::store::StoreOpener;

/// Write `contents` to `path`, panicking on failure.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding a placeholder grid database.
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) database: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let database = root.join("grids.db");
        write_utf8(&database, b"placeholder");
        Self {
            _dir: dir,
            root,
            database,
        }
    }
}

/// Serves a fixed in-memory store regardless of the requested path.
pub(super) struct StubStoreOpener {
    pub(super) store: MemoryStore,
}

impl Default for StubStoreOpener {
    fn default() -> Self {
        Self {
            store: sample_dataset(),
        }
    }
}

impl StoreOpener for StubStoreOpener {
    fn open(&self, _database: &Utf8Path) -> Result<Box<dyn GridStore>, CliError> {
        Ok(Box::new(self.store.clone()))
    }
}
