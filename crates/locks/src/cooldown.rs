//! Per-channel re-trigger suppression.
//!
//! Expiry is a lazily evaluated timestamp check, not a scheduled removal, so
//! there are no timers to leak across restarts. State is never persisted:
//! the registry entry itself is the stronger guard against double-locking.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Short-lived suppression windows, keyed by channel id.
pub struct Cooldowns {
    window: Duration,
    armed: DashMap<String, Instant>,
}

impl Cooldowns {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed: DashMap::new(),
        }
    }

    /// Start (or restart) the suppression window for a channel.
    pub fn arm(&self, channel_id: &str) {
        self.arm_at(channel_id, Instant::now());
    }

    pub fn arm_at(&self, channel_id: &str, now: Instant) {
        self.armed.insert(channel_id.to_string(), now + self.window);
    }

    /// True while the channel's window is still running. Elapsed entries are
    /// dropped on the way out.
    pub fn is_suppressed(&self, channel_id: &str) -> bool {
        self.is_suppressed_at(channel_id, Instant::now())
    }

    pub fn is_suppressed_at(&self, channel_id: &str, now: Instant) -> bool {
        match self.armed.get(channel_id).map(|e| *e.value()) {
            Some(expires_at) if now < expires_at => true,
            Some(_) => {
                self.armed.remove(channel_id);
                false
            },
            None => false,
        }
    }

    /// Remove every elapsed window.
    pub fn evict_elapsed(&self) {
        self.evict_elapsed_at(Instant::now());
    }

    pub fn evict_elapsed_at(&self, now: Instant) {
        self.armed.retain(|_, expires_at| now < *expires_at);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.armed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}
