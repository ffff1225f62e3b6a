//! Durable key-value settings backed by the SQLite database.
//!
//! Only two keys exist: the activation counter and the target bundle
//! identifier. Elapsed time and session state are never persisted.

use crate::constants::{KEY_ACTIVATION_COUNT, KEY_TARGET_BUNDLE_ID};
use crate::db::{migrations, Database};
use crate::error::AppError;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

/// The subset of tracker state that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedState {
    pub activation_count: u32,
    pub target_bundle_id: String,
}

pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    /// Open (or create) the settings database at `path` and apply migrations.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let db = Database::open(path)?;
        migrations::run(db.connection())?;
        Ok(Self { db })
    }

    pub(crate) fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub(crate) fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.db.connection().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load persisted state, defaulting the count to 0 and the target to the
    /// empty string when a key is absent. An unparseable count also falls
    /// back to 0 rather than failing.
    pub fn load(&self) -> Result<PersistedState, AppError> {
        let activation_count = self
            .get(KEY_ACTIVATION_COUNT)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);
        let target_bundle_id = self.get(KEY_TARGET_BUNDLE_ID)?.unwrap_or_default();
        Ok(PersistedState {
            activation_count,
            target_bundle_id,
        })
    }

    /// Write both persisted keys together.
    pub fn save(&self, activation_count: u32, target_bundle_id: &str) -> Result<(), AppError> {
        self.set(KEY_ACTIVATION_COUNT, &activation_count.to_string())?;
        self.set(KEY_TARGET_BUNDLE_ID, target_bundle_id)?;
        Ok(())
    }
}
