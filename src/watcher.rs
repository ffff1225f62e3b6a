//! Polls the platform probe and turns frontmost-application changes into
//! focus events.
//!
//! The OS feed is edge-based: when the frontmost identifier changes, the
//! previous app gets a deactivation and the new one an activation, in that
//! order. Samples without an identifier count as "nothing frontmost".

use crate::constants::DEFAULT_POLL_INTERVAL;
use crate::platform::FocusProbe;
use crate::service::{FocusEvent, FocusEventSender};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct WatcherConfig {
    pub poll_interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub struct FocusWatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FocusWatcher {
    /// Start polling `probe` and emitting focus transitions into `events`.
    pub fn start<P>(probe: P, events: FocusEventSender, config: WatcherConfig) -> Self
    where
        P: FocusProbe + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let mut last: Option<String> = None;
            while flag.load(Ordering::SeqCst) {
                let current = probe.frontmost_app().and_then(|app| app.identifier);
                if current != last {
                    if let Some(prev) = last.take() {
                        if events
                            .send(FocusEvent::Deactivated { app_id: prev })
                            .is_err()
                        {
                            flag.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                    if let Some(app_id) = current.clone() {
                        if events.send(FocusEvent::Activated { app_id }).is_err() {
                            flag.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                    last = current;
                }
                thread::sleep(config.poll_interval);
            }
            debug!("Focus watcher exiting");
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop polling and wait for the worker to finish. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FocusWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
