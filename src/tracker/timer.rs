use crate::service::TrackerMessage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Cancellable repeating tick task.
///
/// At most one worker is alive at a time: `start` tears down the previous
/// worker before spawning a new one, and `cancel` is idempotent. The worker
/// re-checks its run flag after every sleep, so a cancelled task sends no
/// further ticks.
pub struct TickTimer {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Begin sending `Tick` messages once per `period`, replacing any
    /// previously started task.
    pub fn start(&mut self, tx: mpsc::Sender<TrackerMessage>, period: Duration) {
        self.cancel();

        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);
        self.handle = Some(thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                thread::sleep(period);
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                if tx.send(TrackerMessage::Tick).is_err() {
                    // Receiver is gone; nothing left to tick for.
                    break;
                }
            }
        }));
    }

    /// Stop the task. Cancelling an already-stopped timer is a no-op.
    pub fn cancel(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        // The worker observes the flag after its current sleep and exits on
        // its own; dropping the handle detaches it.
        self.handle = None;
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
