//! Claims racing from real threads against the polling side
//!
//! Threads stand in for interrupt context: the host has no interrupts, but
//! true parallelism is a stricter test of the claim/snapshot/clear protocol.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use tripwire_core::trigger::{Baseline, TriggerState};

#[test]
fn concurrent_claims_coalesce_to_one() {
    let state = Arc::new(TriggerState::new());
    state.clear(|| Baseline::default());
    let wins = Arc::new(AtomicU32::new(0));
    let clock = Arc::new(AtomicU64::new(1));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let state = Arc::clone(&state);
            let wins = Arc::clone(&wins);
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    if state.claim(|| clock.fetch_add(1, Ordering::SeqCst)) {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(wins.load(Ordering::SeqCst), 1);
    assert!(state.is_pending());
    assert!(state.snapshot().is_some());
}

#[test]
fn snapshot_never_sees_stale_baseline() {
    let state = Arc::new(TriggerState::new());
    let clock = Arc::new(AtomicU64::new(1));
    let done = Arc::new(AtomicBool::new(false));

    state.clear(|| Baseline {
        micros: clock.fetch_add(1, Ordering::SeqCst),
        epoch_secs: 0,
    });

    let claimers: Vec<_> = (0..4)
        .map(|_| {
            let state = Arc::clone(&state);
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                for _ in 0..20_000 {
                    state.claim(|| clock.fetch_add(1, Ordering::SeqCst));
                }
            })
        })
        .collect();

    let poller = {
        let state = Arc::clone(&state);
        let clock = Arc::clone(&clock);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut reports = 0u32;
            let mut last_event = 0u64;
            loop {
                let finished = done.load(Ordering::SeqCst);
                if let Some(snapshot) = state.snapshot() {
                    // The claim was stamped after the baseline it is measured from
                    assert!(snapshot.interrupt_micros > snapshot.baseline.micros);
                    // Events are reported in order
                    assert!(snapshot.interrupt_micros > last_event);
                    last_event = snapshot.interrupt_micros;
                    reports += 1;

                    state.clear(|| Baseline {
                        micros: clock.fetch_add(1, Ordering::SeqCst),
                        epoch_secs: 0,
                    });
                } else if finished {
                    break;
                }
            }
            reports
        })
    };

    for claimer in claimers {
        claimer.join().unwrap();
    }
    done.store(true, Ordering::SeqCst);

    let reports = poller.join().unwrap();
    assert!(reports >= 1);
    assert!(!state.is_pending());
}
