//! Activation tracking state machine.
//!
//! Owns the observable tracker state and reacts to application focus
//! transitions: a matching activation increments the counter and opens a
//! session, a matching deactivation closes it. The counter and target are
//! persisted on every meaningful change; elapsed time and session state
//! never are, so every process start begins with no active session.
//!
//! All methods must be called from a single thread; `TrackerService`
//! provides that serialization in production.

mod timer;

use crate::constants::TICK_PERIOD;
use crate::error::AppError;
use crate::service::TrackerMessage;
use crate::settings::SettingsStore;
use log::error;
use serde::Serialize;
use std::sync::mpsc;
use std::time::Instant;
use timer::TickTimer;

/// Read-only view of the published tracker fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub activation_count: u32,
    pub elapsed_secs: f64,
    pub target_bundle_id: String,
    pub session_active: bool,
}

type Observer = Box<dyn Fn(&TrackerSnapshot) + Send>;

pub struct ActivationTracker {
    activation_count: u32,
    elapsed_secs: f64,
    target_bundle_id: String,
    /// Present iff a session is active. Guards against duplicate increments
    /// from redundant activation notifications, and holds the invariant
    /// that the tick timer runs exactly while this is set.
    session_started: Option<Instant>,
    timer: TickTimer,
    tick_tx: mpsc::Sender<TrackerMessage>,
    store: SettingsStore,
    observers: Vec<Observer>,
}

impl ActivationTracker {
    /// Restore the persisted counter and target. Elapsed time starts at 0
    /// and no session is active, regardless of how the process ended.
    pub fn new(
        store: SettingsStore,
        tick_tx: mpsc::Sender<TrackerMessage>,
    ) -> Result<Self, AppError> {
        let persisted = store.load()?;
        Ok(Self {
            activation_count: persisted.activation_count,
            elapsed_secs: 0.0,
            target_bundle_id: persisted.target_bundle_id,
            session_started: None,
            timer: TickTimer::new(),
            tick_tx,
            store,
            observers: Vec::new(),
        })
    }

    /// Register a change listener, invoked synchronously on every
    /// observable change from the thread driving this tracker.
    pub fn subscribe(&mut self, observer: impl Fn(&TrackerSnapshot) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn subscribe_boxed(&mut self, observer: Box<dyn Fn(&TrackerSnapshot) + Send>) {
        self.observers.push(observer);
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            activation_count: self.activation_count,
            elapsed_secs: self.elapsed_secs,
            target_bundle_id: self.target_bundle_id.clone(),
            session_active: self.session_started.is_some(),
        }
    }

    /// Some application became frontmost. Non-matching applications are
    /// ignored; a match while a session is already active is a redundant
    /// notification and a no-op.
    pub fn handle_activated(&mut self, app_id: &str) {
        self.handle_activated_at(app_id, Instant::now());
    }

    pub(crate) fn handle_activated_at(&mut self, app_id: &str, now: Instant) {
        if !self.matches_target(app_id) {
            return;
        }
        if self.session_started.is_some() {
            return;
        }

        self.activation_count = self.activation_count.saturating_add(1);
        self.persist();
        self.session_started = Some(now);
        self.elapsed_secs = 0.0;
        self.timer.start(self.tick_tx.clone(), TICK_PERIOD);
        self.notify();
    }

    /// Some application lost frontmost focus. On a match the session ends;
    /// elapsed time keeps its last computed value so the finished session
    /// stays visible until the next activation.
    pub fn handle_deactivated(&mut self, app_id: &str) {
        if !self.matches_target(app_id) {
            return;
        }
        if self.session_started.is_none() {
            return;
        }

        self.timer.cancel();
        self.session_started = None;
        self.notify();
    }

    /// Recompute elapsed time for the active session. A tick that was
    /// already queued when the session ended is a no-op.
    pub fn handle_tick(&mut self) {
        self.handle_tick_at(Instant::now());
    }

    pub(crate) fn handle_tick_at(&mut self, now: Instant) {
        let Some(started) = self.session_started else {
            return;
        };
        self.elapsed_secs = now.saturating_duration_since(started).as_secs_f64();
        self.notify();
    }

    /// Change the watched application. Compares raw strings: any textual
    /// change (including case-only ones) ends the session, zeroes the
    /// counter and elapsed time, and persists the new target together with
    /// the reset counter. Setting the identical string is a no-op.
    pub fn set_target(&mut self, new_target: &str) {
        if new_target == self.target_bundle_id {
            return;
        }

        self.timer.cancel();
        self.session_started = None;
        self.activation_count = 0;
        self.elapsed_secs = 0.0;
        self.target_bundle_id = new_target.to_string();
        self.persist();
        self.notify();
    }

    /// Zero the counter and persist. Elapsed time and any active session
    /// are untouched.
    pub fn reset_count(&mut self) {
        self.activation_count = 0;
        self.persist();
        self.notify();
    }

    fn matches_target(&self, app_id: &str) -> bool {
        !self.target_bundle_id.is_empty()
            && app_id.to_lowercase() == self.target_bundle_id.to_lowercase()
    }

    fn persist(&self) {
        // Focus handlers have no caller to report into; log and keep tracking.
        if let Err(e) = self.store.save(self.activation_count, &self.target_bundle_id) {
            error!("Failed to persist tracker state: {e}");
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer(&snapshot);
        }
    }

    #[cfg(test)]
    fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }
}
