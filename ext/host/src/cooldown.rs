//! `NoticeCooldown` — Rate limiting for repeated denial notices
//!
//! Denial events can fire many times per second for the same cause (an item
//! entity the player keeps walking over, a periodic inventory sweep). The
//! player should see the message once per window, not once per event.
//!
//! Keys are caller-chosen; handlers typically use a (player, source) pair so
//! separate sources cool down independently.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// An expiring map with a fixed cooldown window.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rankgate_host::NoticeCooldown;
///
/// let cooldown = NoticeCooldown::new(Duration::from_secs(5));
/// assert!(cooldown.should_notify(("alice", 7)));   // first notice goes out
/// assert!(!cooldown.should_notify(("alice", 7)));  // suppressed inside the window
/// assert!(cooldown.should_notify(("alice", 8)));   // different source, own window
/// ```
pub struct NoticeCooldown<K> {
    window: Duration,
    last_notice: Mutex<HashMap<K, Instant>>,
}

impl<K: Hash + Eq> NoticeCooldown<K> {
    /// Create a cooldown with the given window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_notice: Mutex::new(HashMap::new()),
        }
    }

    /// The configured window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a notice for `key` should be sent now.
    ///
    /// Returns `true` — and records the attempt — when no notice went out
    /// for this key within the window. Returns `false` otherwise, leaving
    /// the existing window running.
    pub fn should_notify(&self, key: K) -> bool {
        let now = Instant::now();
        let mut map = self.last_notice.lock();
        match map.get(&key) {
            Some(last) if now.duration_since(*last) < self.window => false,
            _ => {
                map.insert(key, now);
                true
            }
        }
    }

    /// Drop entries whose window has fully elapsed.
    ///
    /// Call occasionally from a maintenance tick; entries otherwise
    /// accumulate for as long as sources keep triggering.
    pub fn purge(&self) {
        let now = Instant::now();
        self.last_notice
            .lock()
            .retain(|_, last| now.duration_since(*last) < self.window);
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.last_notice.lock().len()
    }
}
