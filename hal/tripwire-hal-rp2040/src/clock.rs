//! Clocks backed by the embassy time driver
//!
//! The RP2040 has no battery-backed RTC, so wall-clock time is an offset
//! that some other part of the firmware learns (host command, network
//! time) and hands to [`SharedEpoch::set_epoch`].

use embassy_time::Instant;
use portable_atomic::{AtomicBool, AtomicU64, Ordering};
use tripwire_core::traits::{EpochSource, MonotonicClock};

/// Monotonic uptime from the embassy timer (1 MHz on RP2040)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Settable wall clock that advances with uptime
///
/// Reads as 0 until [`set_epoch`](Self::set_epoch) is called, which keeps a
/// time-sync wait spinning until the real time is known.
pub struct SharedEpoch {
    /// Epoch seconds at uptime zero
    boot_epoch: AtomicU64,
    synced: AtomicBool,
}

impl Default for SharedEpoch {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedEpoch {
    /// Create an unsynchronized wall clock
    pub const fn new() -> Self {
        Self {
            boot_epoch: AtomicU64::new(0),
            synced: AtomicBool::new(false),
        }
    }

    /// Set the current wall-clock time (epoch seconds)
    pub fn set_epoch(&self, epoch_secs: u64) {
        let uptime = Instant::now().as_secs();
        self.boot_epoch
            .store(epoch_secs.saturating_sub(uptime), Ordering::Relaxed);
        self.synced.store(true, Ordering::Release);
    }

    /// Check if the wall clock has been set
    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }
}

impl EpochSource for SharedEpoch {
    fn epoch_secs(&self) -> u64 {
        if !self.is_synced() {
            return 0;
        }
        self.boot_epoch.load(Ordering::Relaxed) + Instant::now().as_secs()
    }
}
