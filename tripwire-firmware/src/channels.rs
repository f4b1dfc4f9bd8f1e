//! Shared state between interrupt, tasks and main
//!
//! Statics so the edge task, the poll task and main can reach them without
//! passing references around.

use tripwire_core::TriggerState;
use tripwire_hal_rp2040::clock::SharedEpoch;
use tripwire_hal_rp2040::input::ArmSignal;

/// Pending-event state for the monitored input
///
/// Claimed by the edge task, consumed and cleared by the poll task.
pub static TRIGGER: TriggerState = TriggerState::new();

/// Arm requests from the monitor to the edge task
pub static ARM: ArmSignal = ArmSignal::new();

/// Wall clock, seeded at boot
pub static EPOCH: SharedEpoch = SharedEpoch::new();
