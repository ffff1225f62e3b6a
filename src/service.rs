//! Single serialized execution context for tracker state.
//!
//! Focus events, timer ticks and user commands are all messages on one
//! channel drained by a dedicated thread that owns the
//! [`ActivationTracker`]. Confining every mutation to that thread is the
//! whole concurrency story: no locks, no shared state.

use crate::error::AppError;
use crate::settings::SettingsStore;
use crate::tracker::{ActivationTracker, TrackerSnapshot};
use log::debug;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// Application focus transition reported by the environment. Events arrive
/// for any application, in any order; the tracker does the filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    Activated { app_id: String },
    Deactivated { app_id: String },
}

pub(crate) enum TrackerMessage {
    Focus(FocusEvent),
    Tick,
    SetTarget(String),
    ResetCount,
    Subscribe(Box<dyn Fn(&TrackerSnapshot) + Send>),
    Query(mpsc::Sender<TrackerSnapshot>),
    Shutdown,
}

/// Cloneable handle the event feed uses to push focus transitions into the
/// tracker's queue.
#[derive(Clone)]
pub struct FocusEventSender {
    tx: mpsc::Sender<TrackerMessage>,
}

impl FocusEventSender {
    pub(crate) fn new(tx: mpsc::Sender<TrackerMessage>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: FocusEvent) -> Result<(), AppError> {
        self.tx
            .send(TrackerMessage::Focus(event))
            .map_err(|_| AppError::TrackerStopped)
    }
}

pub struct TrackerService {
    tx: mpsc::Sender<TrackerMessage>,
    handle: Option<JoinHandle<()>>,
}

impl TrackerService {
    /// Spawn the tracker thread. Persisted state is loaded before the
    /// thread starts so initialization errors surface to the caller.
    pub fn spawn(store: SettingsStore) -> Result<Self, AppError> {
        let (tx, rx) = mpsc::channel();
        let mut tracker = ActivationTracker::new(store, tx.clone())?;

        let handle = thread::spawn(move || {
            while let Ok(message) = rx.recv() {
                match message {
                    TrackerMessage::Focus(FocusEvent::Activated { app_id }) => {
                        tracker.handle_activated(&app_id);
                    }
                    TrackerMessage::Focus(FocusEvent::Deactivated { app_id }) => {
                        tracker.handle_deactivated(&app_id);
                    }
                    TrackerMessage::Tick => tracker.handle_tick(),
                    TrackerMessage::SetTarget(target) => tracker.set_target(&target),
                    TrackerMessage::ResetCount => tracker.reset_count(),
                    TrackerMessage::Subscribe(observer) => tracker.subscribe_boxed(observer),
                    TrackerMessage::Query(reply) => {
                        let _ = reply.send(tracker.snapshot());
                    }
                    TrackerMessage::Shutdown => break,
                }
            }
            debug!("Tracker thread exiting");
        });

        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Handle for the event feed driving this tracker.
    pub fn event_sender(&self) -> FocusEventSender {
        FocusEventSender::new(self.tx.clone())
    }

    /// Change the watched application identifier.
    pub fn set_target(&self, target: &str) -> Result<(), AppError> {
        self.send(TrackerMessage::SetTarget(target.to_string()))
    }

    /// Zero the activation counter.
    pub fn reset_count(&self) -> Result<(), AppError> {
        self.send(TrackerMessage::ResetCount)
    }

    /// Register a change listener, invoked synchronously on every
    /// observable change from the tracker thread.
    pub fn subscribe(
        &self,
        observer: impl Fn(&TrackerSnapshot) + Send + 'static,
    ) -> Result<(), AppError> {
        self.send(TrackerMessage::Subscribe(Box::new(observer)))
    }

    /// Synchronous read of the published fields. Queued behind any
    /// messages already sent, so it observes their effects.
    pub fn snapshot(&self) -> Result<TrackerSnapshot, AppError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(TrackerMessage::Query(reply_tx))?;
        reply_rx.recv().map_err(|_| AppError::TrackerStopped)
    }

    fn send(&self, message: TrackerMessage) -> Result<(), AppError> {
        self.tx
            .send(message)
            .map_err(|_| AppError::TrackerStopped)
    }

    /// Stop the tracker thread and wait for it to finish. Idempotent.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(TrackerMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TrackerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsStore;
    use crate::test_utils::setup_test_store;
    use std::time::Duration;

    const TARGET: &str = "com.example.app";
    const WAIT: Duration = Duration::from_secs(1);

    #[test]
    fn test_spawn_restores_persisted_state() {
        let (store, _dir) = setup_test_store();
        store.save(3, TARGET).unwrap();

        let service = TrackerService::spawn(store).unwrap();

        let snapshot = service.snapshot().unwrap();
        assert_eq!(snapshot.activation_count, 3);
        assert_eq!(snapshot.target_bundle_id, TARGET);
        assert!(!snapshot.session_active);
    }

    #[test]
    fn test_focus_events_drive_the_tracker() {
        let (store, _dir) = setup_test_store();
        let service = TrackerService::spawn(store).unwrap();
        service.set_target(TARGET).unwrap();

        let events = service.event_sender();
        events
            .send(FocusEvent::Activated {
                app_id: "COM.EXAMPLE.APP".to_string(),
            })
            .unwrap();

        let snapshot = service.snapshot().unwrap();
        assert_eq!(snapshot.activation_count, 1);
        assert!(snapshot.session_active);

        events
            .send(FocusEvent::Deactivated {
                app_id: TARGET.to_string(),
            })
            .unwrap();

        let snapshot = service.snapshot().unwrap();
        assert_eq!(snapshot.activation_count, 1);
        assert!(!snapshot.session_active);
    }

    #[test]
    fn test_reset_count_via_service() {
        let (store, _dir) = setup_test_store();
        let service = TrackerService::spawn(store).unwrap();
        service.set_target(TARGET).unwrap();

        let events = service.event_sender();
        events
            .send(FocusEvent::Activated {
                app_id: TARGET.to_string(),
            })
            .unwrap();
        service.reset_count().unwrap();

        let snapshot = service.snapshot().unwrap();
        assert_eq!(snapshot.activation_count, 0);
        assert!(snapshot.session_active, "reset leaves the session running");
    }

    #[test]
    fn test_subscribers_receive_synchronous_notifications() {
        let (store, _dir) = setup_test_store();
        let service = TrackerService::spawn(store).unwrap();

        let (seen_tx, seen_rx) = mpsc::channel();
        service
            .subscribe(move |snapshot| {
                let _ = seen_tx.send(snapshot.clone());
            })
            .unwrap();

        service.set_target(TARGET).unwrap();

        let snapshot = seen_rx.recv_timeout(WAIT).unwrap();
        assert_eq!(snapshot.target_bundle_id, TARGET);
        assert_eq!(snapshot.activation_count, 0);
    }

    #[test]
    fn test_state_survives_service_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.db");

        {
            let store = SettingsStore::open(&path).unwrap();
            let service = TrackerService::spawn(store).unwrap();
            service.set_target(TARGET).unwrap();
            service
                .event_sender()
                .send(FocusEvent::Activated {
                    app_id: TARGET.to_string(),
                })
                .unwrap();
            // Force the queue to settle before shutdown.
            assert_eq!(service.snapshot().unwrap().activation_count, 1);
        }

        let store = SettingsStore::open(&path).unwrap();
        let service = TrackerService::spawn(store).unwrap();

        let snapshot = service.snapshot().unwrap();
        assert_eq!(snapshot.activation_count, 1);
        assert_eq!(snapshot.target_bundle_id, TARGET);
        assert!(!snapshot.session_active, "sessions never survive a restart");
        assert_eq!(snapshot.elapsed_secs, 0.0);
    }

    #[test]
    fn test_commands_fail_after_shutdown() {
        let (store, _dir) = setup_test_store();
        let mut service = TrackerService::spawn(store).unwrap();
        let events = service.event_sender();

        service.shutdown();
        service.shutdown();

        assert!(matches!(
            service.set_target(TARGET),
            Err(AppError::TrackerStopped)
        ));
        assert!(matches!(
            events.send(FocusEvent::Activated {
                app_id: TARGET.to_string()
            }),
            Err(AppError::TrackerStopped)
        ));
        assert!(matches!(service.snapshot(), Err(AppError::TrackerStopped)));
    }
}
