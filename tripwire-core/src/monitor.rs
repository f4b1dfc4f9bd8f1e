//! Digital input monitor
//!
//! Ties a [`TriggerState`] to a pin configuration, a monotonic clock and a
//! wall-clock source. The monitor is a plain component: embed it by value in
//! whatever device type needs an edge-triggered input.
//!
//! Lifecycle:
//!
//! 1. [`InputMonitor::set_config`] decodes a document and arms the pin.
//! 2. [`InputMonitor::begin`] waits for a valid epoch (if required) and
//!    records the first baseline.
//! 3. The interrupt handler calls [`TriggerState::claim`] on every edge.
//! 4. The scheduler calls [`PeriodicTask::run_task`]; a pending edge is
//!    turned into a [`TriggerReport`] and the state is cleared.

use alloc::string::String;

use embedded_hal_async::delay::DelayNs;

use crate::config::{self, DecodeError, InputConfig, TaskConfig};
use crate::traits::{
    EpochSource, InputError, InterruptInput, MonotonicClock, PeriodicTask, TaskOutcome,
};
use crate::trigger::{Baseline, TriggerReport, TriggerState};

/// Epoch threshold below which the wall clock is considered unsynchronized
/// (10 000 s, a few hours into 1970)
pub const MIN_VALID_EPOCH: u64 = 10_000;

/// Default number of epoch checks before giving up
pub const SYNC_MAX_ATTEMPTS: u8 = 20;

/// Default delay between epoch checks (ms)
pub const SYNC_POLL_INTERVAL_MS: u32 = 1000;

/// Monitor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorError {
    /// Wall clock did not synchronize within the retry budget
    TimeSyncTimeout,
    /// Configuration document rejected; previous config kept
    ConfigDecode(DecodeError),
    /// Pin cannot raise interrupts
    InterruptUnsupported {
        /// Requested pin
        pin: u8,
    },
    /// Pin mode or attachment rejected by the board layer
    Input(InputError),
}

impl From<DecodeError> for MonitorError {
    fn from(e: DecodeError) -> Self {
        MonitorError::ConfigDecode(e)
    }
}

/// How `begin` waits for the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeSyncPolicy {
    /// Wait for a valid epoch before starting
    pub required: bool,
    /// Epochs below this are "not yet synchronized"
    pub min_valid_epoch: u64,
    /// Maximum number of waits
    pub max_attempts: u8,
    /// Delay between checks (ms)
    pub poll_interval_ms: u32,
}

impl Default for TimeSyncPolicy {
    fn default() -> Self {
        Self {
            required: true,
            min_valid_epoch: MIN_VALID_EPOCH,
            max_attempts: SYNC_MAX_ATTEMPTS,
            poll_interval_ms: SYNC_POLL_INTERVAL_MS,
        }
    }
}

impl TimeSyncPolicy {
    /// Start immediately, whatever the wall clock says
    pub const fn not_required() -> Self {
        Self {
            required: false,
            min_valid_epoch: MIN_VALID_EPOCH,
            max_attempts: SYNC_MAX_ATTEMPTS,
            poll_interval_ms: SYNC_POLL_INTERVAL_MS,
        }
    }

    /// Check if an epoch value looks synchronized
    pub fn is_valid(&self, epoch_secs: u64) -> bool {
        epoch_secs >= self.min_valid_epoch
    }
}

/// Edge/level triggered input monitor
pub struct InputMonitor<'s, C, E> {
    state: &'s TriggerState,
    clock: C,
    epoch: E,
    config: InputConfig,
    sync: TimeSyncPolicy,
    /// Task is being invoked; only `enable_task` changes it
    active: bool,
}

impl<'s, C: MonotonicClock, E: EpochSource> InputMonitor<'s, C, E> {
    /// Create a monitor for `pin`
    ///
    /// The pin is not armed until [`set_config`](Self::set_config) or
    /// [`configure_input`](Self::configure_input) is called.
    pub fn new(pin: u8, state: &'s TriggerState, clock: C, epoch: E) -> Self {
        Self {
            state,
            clock,
            epoch,
            config: InputConfig::new(pin),
            sync: TimeSyncPolicy::default(),
            active: false,
        }
    }

    /// Replace the time synchronization policy
    pub fn with_time_sync(mut self, sync: TimeSyncPolicy) -> Self {
        self.sync = sync;
        self
    }

    /// Start the monitor
    ///
    /// If the policy requires it, checks the wall clock every
    /// `poll_interval_ms` until it is valid, giving up after
    /// `max_attempts` waits. Then records the first baseline.
    pub async fn begin<D: DelayNs>(&self, delay: &mut D) -> Result<(), MonitorError> {
        if self.sync.required {
            let mut attempts = 0;
            while !self.sync.is_valid(self.epoch.epoch_secs()) {
                if attempts >= self.sync.max_attempts {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "Input {}: wall clock not synchronized after {} attempts",
                        self.config.id,
                        attempts
                    );
                    return Err(MonitorError::TimeSyncTimeout);
                }
                delay.delay_ms(self.sync.poll_interval_ms).await;
                attempts += 1;
            }
        }

        self.clear_trigger();
        Ok(())
    }

    /// Current configuration as a JSON document
    pub fn get_config(&self) -> String {
        config::encode(&self.config)
    }

    /// Apply a JSON configuration document and re-arm the pin
    ///
    /// A document that fails to decode leaves the current configuration
    /// untouched. If the pin cannot be armed, the new fields stay assigned
    /// but the previously attached interrupt and the task's run state remain
    /// in effect.
    pub fn set_config<P: InterruptInput>(
        &mut self,
        document: &str,
        pins: &mut P,
    ) -> Result<(), MonitorError> {
        let decoded = config::decode(document).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("Input config rejected: {}", e);
            MonitorError::from(e)
        })?;

        self.config = decoded;
        self.configure_input(pins)?;
        let enabled = self.config.task.enabled;
        self.enable_task(enabled);
        Ok(())
    }

    /// Set the pin mode and attach the interrupt for the current config
    pub fn configure_input<P: InterruptInput>(&self, pins: &mut P) -> Result<(), MonitorError> {
        let pin = self.config.pin;

        pins.configure_pin(pin, self.config.mode)
            .map_err(|e| input_error(pin, e))?;

        if !pins.supports_interrupt(pin) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Pin {} does not support interrupts", pin);
            return Err(MonitorError::InterruptUnsupported { pin });
        }

        pins.attach_interrupt(pin, self.config.trigger)
            .map_err(|e| input_error(pin, e))
    }

    /// Drop any pending event and take a fresh baseline
    pub fn clear_trigger(&self) {
        self.state.clear(|| Baseline {
            micros: self.clock.now_micros(),
            epoch_secs: self.epoch.epoch_secs(),
        });
    }

    /// Current configuration
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

}

impl<'s, C: MonotonicClock, E: EpochSource> PeriodicTask for InputMonitor<'s, C, E> {
    type Report = TriggerReport;

    fn task_config(&self) -> &TaskConfig {
        &self.config.task
    }

    fn enable_task(&mut self, enabled: bool) {
        self.config.task.enabled = enabled;
        self.active = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.active
    }

    fn run_task(&mut self, elapsed_ms: u32) -> TaskOutcome<TriggerReport> {
        if !self.is_enabled() {
            return TaskOutcome::Disabled;
        }
        if !self.is_due(elapsed_ms) {
            return TaskOutcome::NotDue;
        }

        let Some(snapshot) = self.state.snapshot() else {
            return TaskOutcome::Idle;
        };

        let report = TriggerReport::from_snapshot(self.config.id, &snapshot);
        #[cfg(feature = "defmt")]
        defmt::info!(
            "Event {} triggered at {} {}ms",
            report.id,
            report.epoch_secs,
            report.millis
        );

        self.clear_trigger();
        TaskOutcome::Reported(report)
    }
}

fn input_error(pin: u8, e: InputError) -> MonitorError {
    match e {
        InputError::InterruptUnsupported => MonitorError::InterruptUnsupported { pin },
        other => MonitorError::Input(other),
    }
}
