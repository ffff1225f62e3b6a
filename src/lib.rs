//! Core of a menu-bar utility that watches a single application: it counts
//! how often the watched app becomes frontmost and how long the current
//! foreground session has lasted, persisting the counter and the target
//! across restarts.
//!
//! The presentation layer (icon, popover) binds to [`TrackerSnapshot`] via
//! [`TrackerService::subscribe`]/[`TrackerService::snapshot`] and invokes
//! [`TrackerService::set_target`] and [`TrackerService::reset_count`].

pub mod constants;
pub mod db;
pub mod error;
pub mod format;
pub mod platform;
pub mod service;
pub mod settings;
#[cfg(test)]
mod test_utils;
pub mod tracker;
pub mod watcher;

pub use error::AppError;
pub use service::{FocusEvent, FocusEventSender, TrackerService};
pub use settings::SettingsStore;
pub use tracker::TrackerSnapshot;
pub use watcher::{FocusWatcher, WatcherConfig};

use directories::ProjectDirs;
use platform::NativeProbe;
use std::path::PathBuf;

/// Location of the settings database under the per-user data directory.
pub fn data_path() -> Result<PathBuf, AppError> {
    let proj_dirs =
        ProjectDirs::from("com", "watchcat", "Watchcat").ok_or(AppError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("watchcat.db"))
}

/// A running tracker wired to the native focus feed.
pub struct Watchcat {
    service: TrackerService,
    watcher: FocusWatcher,
}

impl Watchcat {
    /// Load persisted state from the default location and start tracking
    /// with the native probe.
    pub fn start() -> Result<Self, AppError> {
        let store = SettingsStore::open(&data_path()?)?;
        Self::with_store(store, WatcherConfig::default())
    }

    /// Start tracking over an explicit store, for hosts that manage their
    /// own data directory.
    pub fn with_store(store: SettingsStore, config: WatcherConfig) -> Result<Self, AppError> {
        let service = TrackerService::spawn(store)?;
        let watcher = FocusWatcher::start(NativeProbe::new(), service.event_sender(), config);
        Ok(Self { service, watcher })
    }

    pub fn service(&self) -> &TrackerService {
        &self.service
    }

    /// Stop the focus feed, then the tracker thread.
    pub fn shutdown(mut self) {
        self.watcher.stop();
        self.service.shutdown();
    }
}
