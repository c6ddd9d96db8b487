// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the timer registry.
//!
//! 1. Drained tasks come out in non-decreasing deadline order
//! 2. Canceled tasks never come out
//! 3. Nothing comes out after dispose

use keylift_timer::TimerRegistry;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Schedule { now: u64, delay: u64 },
    CancelNth(usize),
    Drain(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..1_000, 0u64..500).prop_map(|(now, delay)| Op::Schedule { now, delay }),
        (0usize..16).prop_map(Op::CancelNth),
        (0u64..2_000).prop_map(Op::Drain),
    ]
}

proptest! {
    #[test]
    fn drained_deadlines_are_monotonic(ops in prop::collection::vec((0u64..1_000, 0u64..500), 1..32)) {
        let mut timers = TimerRegistry::new();
        for (i, (now, delay)) in ops.iter().enumerate() {
            timers.schedule((i, now + delay), *now, *delay);
        }
        let mut last = 0;
        while let Some((_, (_, deadline))) = timers.pop_due(u64::MAX) {
            prop_assert!(deadline >= last);
            last = deadline;
        }
        prop_assert!(timers.is_empty());
    }

    #[test]
    fn canceled_tasks_never_fire(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut timers = TimerRegistry::new();
        let mut live = Vec::new();
        let mut canceled = Vec::new();
        for op in ops {
            match op {
                Op::Schedule { now, delay } => {
                    if let Some(id) = timers.schedule(live.len() + canceled.len(), now, delay) {
                        live.push(id);
                    }
                }
                Op::CancelNth(n) => {
                    if !live.is_empty() {
                        let id = live.remove(n % live.len());
                        if timers.cancel(id) {
                            canceled.push(id);
                        }
                    }
                }
                Op::Drain(now) => {
                    while let Some((id, _)) = timers.pop_due(now) {
                        prop_assert!(!canceled.contains(&id));
                        live.retain(|l| *l != id);
                    }
                }
            }
        }
        while let Some((id, _)) = timers.pop_due(u64::MAX) {
            prop_assert!(!canceled.contains(&id));
        }
    }

    #[test]
    fn dispose_silences_everything(delays in prop::collection::vec(0u64..500, 0..16)) {
        let mut timers = TimerRegistry::new();
        for delay in &delays {
            timers.schedule(*delay, 0, *delay);
        }
        timers.dispose();
        prop_assert!(timers.pop_due(u64::MAX).is_none());
        prop_assert!(timers.schedule(0, 0, 0).is_none());
    }
}
