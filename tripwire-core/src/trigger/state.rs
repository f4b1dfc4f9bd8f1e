//! Shared trigger state
//!
//! The only state shared between interrupt context and task context.
//! There are exactly two ways in:
//!
//! - [`TriggerState::claim`], from the interrupt handler: a lock-free
//!   compare-exchange on the pending flag, followed by a short critical
//!   section to record the interrupt time.
//! - [`TriggerState::snapshot`] / [`TriggerState::clear`], from the polling
//!   task: the timestamp group is read or reset as a whole inside a
//!   critical section.
//!
//! ```text
//!            claim (ISR)                 clear (task)
//!   Idle ─────────────────▶ Pending ─────────────────▶ Idle
//!    ▲                        │  ▲                      │
//!    │                        └──┘ claim: coalesced     │
//!    └──────────────────────────────────────────────────┘
//! ```

use core::cell::Cell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, Ordering};

/// Monotonic and wall-clock time recorded at the last clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Baseline {
    /// Uptime at the clear (µs)
    pub micros: u64,
    /// Wall-clock epoch at the clear (s)
    pub epoch_secs: u64,
}

/// Consistent copy of the timestamp group for a pending event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerSnapshot {
    /// Uptime when the event was claimed (µs)
    pub interrupt_micros: u64,
    /// Baseline the event is measured against
    pub baseline: Baseline,
}

impl TriggerSnapshot {
    /// Milliseconds between the baseline and the interrupt
    ///
    /// Saturates at zero if the interrupt time predates the baseline.
    pub fn elapsed_millis(&self) -> u64 {
        self.interrupt_micros.saturating_sub(self.baseline.micros) / 1000
    }

    /// Wall-clock time of the event as (epoch seconds, millisecond remainder)
    pub fn event_time(&self) -> (u64, u16) {
        let elapsed = self.elapsed_millis();
        (
            self.baseline.epoch_secs + elapsed / 1000,
            (elapsed % 1000) as u16,
        )
    }
}

/// Fields protected by the critical section
#[derive(Clone, Copy)]
struct Group {
    /// `None` until the claiming handler has stamped the event
    interrupt_micros: Option<u64>,
    baseline: Baseline,
}

impl Group {
    const EMPTY: Group = Group {
        interrupt_micros: None,
        baseline: Baseline {
            micros: 0,
            epoch_secs: 0,
        },
    };
}

/// Latched "an edge happened" state for one input pin
///
/// Designed to live in a `static` so the interrupt handler and the polling
/// task can both reach it:
///
/// ```ignore
/// static TRIGGER: TriggerState = TriggerState::new();
/// ```
pub struct TriggerState {
    pending: AtomicBool,
    group: Mutex<Cell<Group>>,
}

impl Default for TriggerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerState {
    /// Create a cleared state with a zero baseline
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            group: Mutex::new(Cell::new(Group::EMPTY)),
        }
    }

    /// Interrupt handler entry point
    ///
    /// Claims the event if none is pending and stamps it with `now()`.
    /// If an event is already pending the edge is coalesced into it and
    /// `now` is never called. Returns true if this call claimed the event.
    ///
    /// Bounded time, no allocation, no logging: safe from interrupt context.
    pub fn claim(&self, now: impl FnOnce() -> u64) -> bool {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        critical_section::with(|cs| {
            let cell = self.group.borrow(cs);
            let mut group = cell.get();
            group.interrupt_micros = Some(now());
            cell.set(group);
        });
        true
    }

    /// Check if an unconsumed event is pending
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Copy the timestamp group of a pending event
    ///
    /// Returns `None` if nothing is pending, or if the claiming handler
    /// has not finished stamping yet (it will be there on the next poll).
    pub fn snapshot(&self) -> Option<TriggerSnapshot> {
        if !self.is_pending() {
            return None;
        }

        critical_section::with(|cs| {
            let group = self.group.borrow(cs).get();
            group.interrupt_micros.map(|interrupt_micros| TriggerSnapshot {
                interrupt_micros,
                baseline: group.baseline,
            })
        })
    }

    /// Reset to idle with a fresh baseline
    ///
    /// `baseline` is sampled inside the critical section, so a claim can
    /// never be stamped against the previous baseline.
    pub fn clear(&self, baseline: impl FnOnce() -> Baseline) {
        critical_section::with(|cs| {
            self.group.borrow(cs).set(Group {
                interrupt_micros: None,
                baseline: baseline(),
            });
            self.pending.store(false, Ordering::Release);
        });
    }

    /// Baseline recorded by the last clear
    pub fn baseline(&self) -> Baseline {
        critical_section::with(|cs| self.group.borrow(cs).get().baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(micros: u64, epoch_secs: u64) -> Baseline {
        Baseline { micros, epoch_secs }
    }

    #[test]
    fn test_starts_idle() {
        let state = TriggerState::new();
        assert!(!state.is_pending());
        assert_eq!(state.snapshot(), None);
        assert_eq!(state.baseline(), Baseline::default());
    }

    #[test]
    fn test_claim_records_time() {
        let state = TriggerState::new();
        state.clear(|| baseline(5_000_000, 1_700_000_000));

        assert!(state.claim(|| 6_234_000));
        assert!(state.is_pending());

        let snap = state.snapshot().unwrap();
        assert_eq!(snap.interrupt_micros, 6_234_000);
        assert_eq!(snap.baseline, baseline(5_000_000, 1_700_000_000));
    }

    #[test]
    fn test_coalesces_while_pending() {
        let state = TriggerState::new();
        state.clear(|| baseline(0, 0));

        assert!(state.claim(|| 1_000));
        // Later edges are dropped and never sample the clock
        assert!(!state.claim(|| panic!("clock sampled for coalesced edge")));
        assert!(!state.claim(|| panic!("clock sampled for coalesced edge")));

        assert_eq!(state.snapshot().unwrap().interrupt_micros, 1_000);
    }

    #[test]
    fn test_snapshot_does_not_consume() {
        let state = TriggerState::new();
        state.claim(|| 42);
        assert_eq!(state.snapshot(), state.snapshot());
        assert!(state.is_pending());
    }

    #[test]
    fn test_clear_rearms() {
        let state = TriggerState::new();
        state.clear(|| baseline(0, 100));
        state.claim(|| 10);

        state.clear(|| baseline(20, 200));
        assert!(!state.is_pending());
        assert_eq!(state.snapshot(), None);
        assert_eq!(state.baseline(), baseline(20, 200));

        // Clearing twice changes nothing but the baseline
        state.clear(|| baseline(30, 300));
        assert!(state.claim(|| 40));
        let snap = state.snapshot().unwrap();
        assert_eq!(snap.interrupt_micros, 40);
        assert_eq!(snap.baseline, baseline(30, 300));
    }

    #[test]
    fn test_event_time() {
        let snap = TriggerSnapshot {
            interrupt_micros: 6_234_000,
            baseline: baseline(5_000_000, 1_700_000_000),
        };
        assert_eq!(snap.elapsed_millis(), 1_234);
        assert_eq!(snap.event_time(), (1_700_000_001, 234));
    }

    #[test]
    fn test_event_time_sub_millisecond_truncates() {
        let snap = TriggerSnapshot {
            interrupt_micros: 1_999,
            baseline: baseline(1_000, 50),
        };
        assert_eq!(snap.event_time(), (50, 0));
    }

    #[test]
    fn test_event_time_before_baseline_saturates() {
        let snap = TriggerSnapshot {
            interrupt_micros: 100,
            baseline: baseline(5_000, 1_000),
        };
        assert_eq!(snap.elapsed_millis(), 0);
        assert_eq!(snap.event_time(), (1_000, 0));
    }
}
