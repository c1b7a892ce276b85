//! Property tests for trigger coalescing.

use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;

use watchrun::application::coalescer;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: any number of signals without a wait leaves exactly one token.
    #[test]
    fn property_signals_collapse_to_one_token(signals in 1usize..200) {
        let (trigger, waiter) = coalescer();

        let produced = (0..signals).filter(|_| trigger.signal()).count();

        prop_assert_eq!(produced, 1);
        prop_assert!(waiter.try_wait());
        prop_assert!(!waiter.try_wait());
    }

    /// PROPERTY: rounds of signal-then-wait never lose or duplicate a request.
    #[test]
    fn property_each_round_yields_one_wakeup(bursts in proptest::collection::vec(1usize..20, 1..20)) {
        let (trigger, waiter) = coalescer();

        for burst in bursts {
            for _ in 0..burst {
                trigger.signal();
            }
            prop_assert!(waiter.try_wait());
            prop_assert!(!waiter.try_wait());
        }
    }

    /// PROPERTY: concurrent producers still leave a single token.
    #[test]
    fn property_concurrent_signals_collapse(threads in 2usize..8, per_thread in 1usize..50) {
        let (trigger, waiter) = coalescer();
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let trigger = trigger.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    (0..per_thread).filter(|_| trigger.signal()).count()
                })
            })
            .collect();
        let produced: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        prop_assert_eq!(produced, 1);
        prop_assert!(waiter.try_wait());
        prop_assert!(!waiter.try_wait());
    }
}
