//! Sliding-window write limiter.
//!
//! Bounds the rate of write operations per client identity, independent of
//! wallet identity and orthogonal to the tip gate. The read-count,
//! compare-to-max, increment sequence is a single atomic unit under the
//! mutex, so two concurrent writes cannot both pass a count check that
//! should have rejected the second.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::oracle::ClientId;

/// Configuration for the write limiter.
#[derive(Debug, Clone)]
pub struct WriteLimiterConfig {
    /// Length of the counting window.
    pub window: Duration,
    /// Maximum permitted writes per window.
    pub max_writes: u32,
}

impl Default for WriteLimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(5 * 60),
            max_writes: 3,
        }
    }
}

/// Per-client window counter.
struct Window {
    count: u32,
    started: Instant,
}

/// Sliding-window counter keyed by client identity.
///
/// Exceeding the limit rejects the write immediately; there is no
/// artificial delay on near-limit requests. A window resets once it has
/// fully elapsed.
pub struct WriteLimiter {
    config: WriteLimiterConfig,
    windows: Mutex<HashMap<ClientId, Window>>,
}

impl WriteLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: WriteLimiterConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Atomically consume one unit of the client's write budget.
    ///
    /// Returns `false` when the budget for the current window is spent.
    /// Rejected calls consume nothing.
    pub fn try_acquire(&self, client: &ClientId) -> bool {
        let mut windows = self.windows.lock().unwrap();
        let now = Instant::now();

        let window = windows.entry(client.clone()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(window.started) >= self.config.window {
            window.count = 0;
            window.started = now;
        }

        if window.count >= self.config.max_writes {
            return false;
        }
        window.count += 1;
        true
    }

    /// Drop windows that have fully elapsed, keeping the map bounded.
    pub fn prune(&self) {
        let mut windows = self.windows.lock().unwrap();
        let now = Instant::now();
        windows.retain(|_, w| now.duration_since(w.started) < self.config.window);
    }

    /// The limiter's configuration.
    pub fn config(&self) -> &WriteLimiterConfig {
        &self.config
    }
}
