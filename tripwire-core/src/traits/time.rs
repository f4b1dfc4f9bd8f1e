//! Time source traits
//!
//! The monitor needs two clocks: a monotonic uptime counter sampled from
//! interrupt context, and a wall-clock epoch that may only become valid
//! once the device has synchronized (NTP, RTC, host command, ...).

/// Monotonic device uptime
///
/// Must never go backwards and must be callable from interrupt context
/// (no locking, no blocking).
pub trait MonotonicClock {
    /// Microseconds since boot
    fn now_micros(&self) -> u64;
}

/// Wall-clock time source
pub trait EpochSource {
    /// Seconds since the Unix epoch
    ///
    /// Values below [`TimeSyncPolicy::min_valid_epoch`] are treated as
    /// "not yet synchronized".
    ///
    /// [`TimeSyncPolicy::min_valid_epoch`]: crate::monitor::TimeSyncPolicy
    fn epoch_secs(&self) -> u64;
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

impl<T: EpochSource + ?Sized> EpochSource for &T {
    fn epoch_secs(&self) -> u64 {
        (**self).epoch_secs()
    }
}
