use std::time::Duration;

/// Settings key holding the persisted activation counter.
pub const KEY_ACTIVATION_COUNT: &str = "activation_count";

/// Settings key holding the persisted target bundle identifier.
pub const KEY_TARGET_BUNDLE_ID: &str = "target_bundle_id";

/// Interval between elapsed-time recomputations while a session is active.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Default interval between frontmost-application probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
