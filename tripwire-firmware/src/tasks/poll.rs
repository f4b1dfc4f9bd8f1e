//! Monitor polling task
//!
//! Drives the monitor's periodic task from a fixed ticker. The monitor
//! decides on its own period; the ticker only sets the resolution.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};
use tripwire_core::scheduler::TaskTimer;
use tripwire_core::traits::TaskOutcome;
use tripwire_core::InputMonitor;
use tripwire_hal_rp2040::clock::{EmbassyClock, SharedEpoch};

/// Scheduler tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 10;

/// Monitor wired to the firmware clocks and trigger state
pub type Monitor = InputMonitor<'static, EmbassyClock, &'static SharedEpoch>;

#[embassy_executor::task]
pub async fn poll_task(mut monitor: Monitor) {
    info!(
        "Poll task started ({} every {}ms)",
        monitor.config().task.name.as_str(),
        monitor.config().task.period_ms
    );

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut timer = TaskTimer::new();
    let mut last = Instant::now();

    loop {
        ticker.next().await;

        let now = Instant::now();
        let delta_ms = (now - last).as_millis() as u32;
        last = now;

        if let TaskOutcome::Reported(report) = timer.tick(&mut monitor, delta_ms) {
            debug!(
                "Input {} report: {}s +{}ms",
                report.id, report.epoch_secs, report.millis
            );
        }
    }
}
