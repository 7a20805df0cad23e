//! Notification rate limiting
//!
//! The sim emits CarTelemetry and LapData at up to 60 Hz each; notifying
//! consumers for every one would be wasted work. Those two types only
//! notify when at least the minimum interval has passed since the last
//! notification of any relevant type. Everything else notifies immediately
//! and refreshes the gate.

use std::time::{Duration, Instant};

pub const MIN_NOTIFY_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct NotifyThrottle {
    min_interval: Duration,
    last_notify: Option<Instant>,
}

impl NotifyThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_notify: None,
        }
    }

    /// Decide whether a notification may fire at `now`. High-frequency
    /// packet types are suppressed inside the interval; all admitted
    /// notifications move the gate forward.
    pub fn admit(&mut self, high_frequency: bool, now: Instant) -> bool {
        if high_frequency {
            if let Some(last) = self.last_notify {
                if now.duration_since(last) < self.min_interval {
                    return false;
                }
            }
        }
        self.last_notify = Some(now);
        true
    }
}

impl Default for NotifyThrottle {
    fn default() -> Self {
        Self::new(MIN_NOTIFY_INTERVAL)
    }
}
