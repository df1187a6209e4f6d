use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Countdown latch: [`wait`](CompletionBarrier::wait) returns once `count`
/// completions have been signalled.
///
/// A barrier created with a count of zero is already released.
#[derive(Debug)]
pub(crate) struct CompletionBarrier {
    remaining: Mutex<usize>,
    released:  Condvar,
}

impl CompletionBarrier {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: Mutex::new(count),
            released:  Condvar::new(),
        })
    }

    /// Record one completion.
    ///
    /// Signals beyond the initial count are ignored rather than wrapping.
    pub fn done(&self) {
        let mut remaining = self.remaining.lock().unwrap_or_else(PoisonError::into_inner);
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.released.notify_all();
        }
    }

    /// Block until every expected completion has been signalled.
    pub fn wait(&self) {
        let remaining = self.remaining.lock().unwrap_or_else(PoisonError::into_inner);
        let _released = self
            .released
            .wait_while(remaining, |n| *n > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Hand out a guard that signals completion when dropped, including
    /// during unwinding.
    pub fn guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            barrier: Arc::clone(self),
        }
    }
}

/// Signals its barrier exactly once, on drop.
pub(crate) struct CompletionGuard {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.barrier.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_count_is_released_immediately() {
        CompletionBarrier::new(0).wait();
    }

    #[test]
    fn wait_happens_after_every_signal() {
        let barrier = CompletionBarrier::new(4);
        let finished = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let guard = barrier.guard();
                let finished = Arc::clone(&finished);
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(5 * i));
                    finished.fetch_add(1, Ordering::SeqCst);
                    drop(guard);
                })
            })
            .collect();

        barrier.wait();
        assert_eq!(finished.load(Ordering::SeqCst), 4);

        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn guard_signals_during_panic() {
        let barrier = CompletionBarrier::new(1);
        let guard = barrier.guard();
        let handle = thread::spawn(move || {
            let _guard = guard;
            panic!("boom");
        });
        assert!(handle.join().is_err());
        barrier.wait();
    }
}
