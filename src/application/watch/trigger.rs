//! Trigger coalescing
//!
//! A single-slot channel: any number of `signal()` calls made while a token
//! is pending collapse into that one token. The consumer takes at most one
//! run request per `wait()`.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError};
use std::time::Duration;

/// Create a connected producer/consumer pair
pub fn coalescer() -> (Trigger, TriggerWaiter) {
    let (tx, rx) = mpsc::sync_channel(1);
    (Trigger { tx }, TriggerWaiter { rx })
}

/// Producer side. Cheap to clone, safe to share between threads.
#[derive(Debug, Clone)]
pub struct Trigger {
    tx: SyncSender<()>,
}

impl Trigger {
    /// Request a run. Never blocks.
    ///
    /// Returns `true` if this call produced the pending token, `false` if a
    /// token was already pending (or the consumer is gone).
    pub fn signal(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) | Err(TrySendError::Disconnected(())) => false,
        }
    }
}

/// Consumer side
#[derive(Debug)]
pub struct TriggerWaiter {
    rx: Receiver<()>,
}

impl TriggerWaiter {
    /// Block until a token is available and consume it.
    ///
    /// Returns `false` once every `Trigger` has been dropped and no token is
    /// left.
    pub fn wait(&self) -> bool {
        self.rx.recv().is_ok()
    }

    /// Consume a pending token without blocking
    pub fn try_wait(&self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }

    /// Like `wait`, but gives up after `timeout`
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn burst_of_signals_leaves_one_token() {
        let (trigger, waiter) = coalescer();

        assert!(trigger.signal());
        for _ in 0..10 {
            assert!(!trigger.signal());
        }

        assert!(waiter.try_wait());
        assert!(!waiter.try_wait());
    }

    #[test]
    fn signal_after_consume_is_not_lost() {
        let (trigger, waiter) = coalescer();

        trigger.signal();
        assert!(waiter.wait());
        assert!(trigger.signal());
        assert!(waiter.wait_timeout(Duration::from_millis(100)));
    }

    #[test]
    fn wait_timeout_without_signal_times_out() {
        let (_trigger, waiter) = coalescer();
        assert!(!waiter.wait_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn wait_returns_false_when_producers_are_gone() {
        let (trigger, waiter) = coalescer();
        trigger.signal();
        drop(trigger);

        // The buffered token is still delivered first.
        assert!(waiter.wait());
        assert!(!waiter.wait());
    }

    #[test]
    fn signal_without_consumer_does_not_block() {
        let (trigger, waiter) = coalescer();
        drop(waiter);
        assert!(!trigger.signal());
    }

    #[test]
    fn concurrent_producers_coalesce() {
        let (trigger, waiter) = coalescer();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let trigger = trigger.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    (0..100).filter(|_| trigger.signal()).count()
                })
            })
            .collect();

        let produced: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(produced, 1);
        assert!(waiter.try_wait());
        assert!(!waiter.try_wait());
    }
}
