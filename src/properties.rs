//! Property tests over the whole protocol.
//!
//! [`Recorder`] panics on any over-delivery or post-terminal signal, so each
//! property only has to drive a publisher with arbitrary demand and check the
//! totals.

use std::sync::Arc;

use proptest::prelude::*;

use crate::testing::{Recorder, Signal};
use crate::{
    Completion, Demand, Never, PassthroughSubject, Publisher, PublisherExt, Sequence, Subject,
};

fn demand_steps() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..5, 0..20)
}

fn granted(steps: &[u64]) -> u64 {
    steps.iter().sum()
}

fn terminal_count<T, E>(signals: &[Signal<T, E>]) -> usize {
    signals
        .iter()
        .filter(|s| matches!(s, Signal::Completion(_)))
        .count()
}

proptest! {
    #[test]
    fn prop_sequence_never_over_delivers(len in 0u32..40, steps in demand_steps()) {
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::NONE));
        Sequence::new(0..len).subscribe(Arc::clone(&rec));
        for step in &steps {
            rec.request(Demand::max(*step));
        }

        let expected = u64::from(len).min(granted(&steps));
        prop_assert_eq!(rec.values().len() as u64, expected);
        prop_assert_eq!(rec.values(), (0..expected as u32).collect::<Vec<_>>());
        prop_assert!(terminal_count(&rec.signals()) <= 1);
        prop_assert_eq!(rec.is_terminated(), expected == u64::from(len));
    }

    #[test]
    fn prop_subject_respects_each_demand(sends in 0u32..30, steps in demand_steps()) {
        let subject = PassthroughSubject::<u32, Never>::new();
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::NONE));
        subject.subscribe(Arc::clone(&rec));

        let mut step_iter = steps.iter();
        for v in 0..sends {
            if let Some(step) = step_iter.next() {
                rec.request(Demand::max(*step));
            }
            subject.send(v);
        }
        subject.send_completion(Completion::Finished);
        subject.send_completion(Completion::Finished);

        prop_assert!(rec.values().len() as u64 <= granted(&steps));
        prop_assert_eq!(terminal_count(&rec.signals()), 1);
    }

    #[test]
    fn prop_count_matches_length(len in 0u32..200) {
        let rec = Arc::new(Recorder::<u64, Never>::new(Demand::max(1)));
        Sequence::new(0..len).count().subscribe(Arc::clone(&rec));
        prop_assert_eq!(rec.values(), vec![u64::from(len)]);
        prop_assert_eq!(rec.completion(), Some(Completion::Finished));
    }

    #[test]
    fn prop_prefix_stops_at_trigger(before in 0u32..30, after in 0u32..30) {
        let main = PassthroughSubject::<u32, Never>::new();
        let trigger = PassthroughSubject::<(), Never>::new();
        let rec = Arc::new(Recorder::<u32, Never>::unbounded());
        main.clone().prefix_until_output(trigger.clone()).subscribe(Arc::clone(&rec));

        (0..before).for_each(|v| main.send(v));
        trigger.send(());
        (before..before + after).for_each(|v| main.send(v));
        trigger.send(());

        prop_assert_eq!(rec.values(), (0..before).collect::<Vec<_>>());
        prop_assert_eq!(terminal_count(&rec.signals()), 1);
        prop_assert_eq!(rec.completion(), Some(Completion::Finished));
    }

    #[test]
    fn prop_cancel_inside_receive_stops_delivery(len in 1u32..50, stop_at in 1usize..50) {
        let rec = Arc::new(Recorder::<u32, Never>::unbounded().cancel_after(stop_at));
        Sequence::new(0..len).map(|v| v * 3).subscribe(Arc::clone(&rec));
        let delivered = (len as usize).min(stop_at);
        prop_assert_eq!(rec.values().len(), delivered);
        prop_assert_eq!(rec.is_terminated(), (len as usize) < stop_at);
    }
}
