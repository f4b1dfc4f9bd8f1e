//! Trigger reports

use super::state::TriggerSnapshot;

/// A consumed trigger event with its wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerReport {
    /// Configured input id
    pub id: i32,
    /// Event time, whole seconds since the Unix epoch
    pub epoch_secs: u64,
    /// Sub-second remainder (0-999 ms)
    pub millis: u16,
}

impl TriggerReport {
    /// Build a report for input `id` from a pending snapshot
    pub fn from_snapshot(id: i32, snapshot: &TriggerSnapshot) -> Self {
        let (epoch_secs, millis) = snapshot.event_time();
        Self {
            id,
            epoch_secs,
            millis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::Baseline;

    #[test]
    fn test_from_snapshot() {
        let snapshot = TriggerSnapshot {
            interrupt_micros: 6_234_000,
            baseline: Baseline {
                micros: 5_000_000,
                epoch_secs: 1_700_000_000,
            },
        };

        let report = TriggerReport::from_snapshot(3, &snapshot);
        assert_eq!(report.id, 3);
        assert_eq!(report.epoch_secs, 1_700_000_001);
        assert_eq!(report.millis, 234);
    }
}
