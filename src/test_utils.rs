//! Shared test utilities.

#![cfg(test)]

use crate::settings::SettingsStore;
use tempfile::{tempdir, TempDir};

/// Create a settings store over a temporary database with migrations applied.
///
/// The `TempDir` must be kept alive for the duration of the test to prevent
/// the database file from being deleted.
pub fn setup_test_store() -> (SettingsStore, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let store = SettingsStore::open(&dir.path().join("test.db"))
        .expect("Failed to open test settings store");
    (store, dir)
}
