//! Time sources for the session timer and deferred settle
//!
//! The session never reads the system time directly. [`SystemClock`] backs the real
//! game; [`ManualClock`] is advanced by hand so timing behavior can be tested
//! deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Monotonic milliseconds since an arbitrary origin
    fn now_ms(&self) -> u64;

    /// Wall-clock milliseconds since the Unix epoch
    fn unix_ms(&self) -> u64;
}

/// Clock backed by [`Instant`] and [`SystemTime`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn unix_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Hand-driven clock; clones share the same time
///
/// # Examples
///
/// ```
/// use tui_2048_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(250);
/// assert_eq!(clock.now_ms(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    unix_base: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose wall time starts at `unix_base` milliseconds
    pub fn with_unix_base(unix_base: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(0)),
            unix_base,
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn unix_ms(&self) -> u64 {
        self.unix_base + self.now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let a = ManualClock::with_unix_base(1_000);
        let b = a.clone();
        a.advance(10);
        b.advance(5);
        assert_eq!(a.now_ms(), 15);
        assert_eq!(b.unix_ms(), 1_015);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let t1 = clock.now_ms();
        let t2 = clock.now_ms();
        assert!(t2 >= t1);
        assert!(clock.unix_ms() > 0);
    }
}
